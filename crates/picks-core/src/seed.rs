//! Fixed seed tables the catalog is generated from.
//!
//! These tables are product data, not operator configuration: categories,
//! the twelve seed titles per category, price bands, brand pools, image
//! queries, audience copy, the creator roster, and the static merchandising
//! groups (packs, guides, collections). Changing a table changes every
//! derived id downstream, so additions go at the end of a pool, never in the
//! middle.

use crate::model::{CreatorProfile, SocialLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: &'static str,
    pub label: &'static str,
    /// Background tone used by the storefront for category tiles.
    pub tone: &'static str,
}

/// Audience framing copy shown on category browse pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryAudience {
    pub who_for: &'static str,
    pub who_not_for: &'static str,
}

/// A curated multi-product bundle.
#[derive(Debug, Clone)]
pub struct Pack {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub min_price: f64,
    pub max_price: f64,
    pub mindset_tag: &'static str,
    pub products: &'static [&'static str],
}

/// A short editorial guide referencing a handful of products.
#[derive(Debug, Clone)]
pub struct Guide {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub body: &'static str,
    pub products: &'static [&'static str],
}

/// A themed product grouping for browse pages.
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub products: &'static [&'static str],
}

/// The fixed ordered category list. Generation iterates this order, so the
/// catalog ordinal (and thus `created_at`) is stable.
#[must_use]
pub fn categories() -> &'static [CategoryDef] {
    &[
        CategoryDef { id: "grooming", label: "Grooming", tone: "#d9d5c9" },
        CategoryDef { id: "tech", label: "Tech", tone: "#d3d6cf" },
        CategoryDef { id: "fitness", label: "Fitness", tone: "#d6d0c4" },
        CategoryDef { id: "food", label: "Food", tone: "#d8d2c6" },
        CategoryDef { id: "home-decor", label: "Home Decor", tone: "#d2d0c8" },
        CategoryDef { id: "phone-apps", label: "Phone Apps", tone: "#d4d6cf" },
        CategoryDef { id: "phone-cases", label: "Phone Cases", tone: "#d7d4cb" },
        CategoryDef { id: "clothes", label: "Clothes", tone: "#d3d0c7" },
        CategoryDef { id: "watches", label: "Watches", tone: "#cecbbf" },
    ]
}

/// The twelve seed titles for a category. Unknown categories get an empty
/// slice (and therefore generate nothing).
#[must_use]
pub fn seed_titles(category: &str) -> &'static [&'static str] {
    match category {
        "grooming" => &[
            "Precision Safety Razor",
            "Featherweight Trimmer",
            "Cedar Beard Oil",
            "Daily Hydration Gel",
            "Charcoal Face Cleanser",
            "Balanced Shampoo Bar",
            "Matte Styling Cream",
            "Silk Edge Brush",
            "Aftershave Calm Mist",
            "Daily SPF Moisturizer",
            "Stainless Nail Kit",
            "Travel Groom Pouch",
        ],
        "tech" => &[
            "Foldable USB-C Hub",
            "Ultra-Wide Desk Monitor",
            "Low-Latency Earbuds",
            "Mechanical 75 Keyboard",
            "Noise-Control Headset",
            "Portable NVMe Drive",
            "GaN Fast Charger",
            "MagSafe Battery Dock",
            "Compact Smart Speaker",
            "4K Streaming Stick",
            "Air Quality Sensor",
            "Ergonomic Vertical Mouse",
        ],
        "fitness" => &[
            "Adjustable Kettlebell",
            "Grip-Tuned Resistance Bands",
            "Compact Foam Roller",
            "Core Balance Disc",
            "Breathable Gym Duffle",
            "Speed Rope Pro",
            "Recovery Massage Gun",
            "Hydration Tracking Bottle",
            "Trail Performance Cap",
            "Mobility Loop Set",
            "Stability Training Mat",
            "Post-Workout Recovery Kit",
        ],
        "food" => &[
            "Single-Origin Pour Over Set",
            "Cold Brew Carafe",
            "Precision Grinder",
            "Airtight Pantry Canisters",
            "Chef Carbon Knife",
            "Low-Smoke Grill Pan",
            "Sea Salt Flake Trio",
            "Morning Protein Blend",
            "All-Day Electrolyte Mix",
            "Minimal Meal Prep Box",
            "Organic Olive Pair",
            "Cast Iron Mini Dutch Oven",
        ],
        "home-decor" => &[
            "Walnut Entry Shelf",
            "Linen Throw Blanket",
            "Brushed Steel Floor Lamp",
            "Acoustic Panel Set",
            "Ceramic Table Vessel",
            "Stone Texture Planter",
            "Modular Book Stand",
            "Sculpted Mirror Tray",
            "Matte Black Wall Hooks",
            "Woven Lounge Rug",
            "Stackable Storage Crates",
            "Ambient Candle Diffuser",
        ],
        "phone-apps" => &[
            "Focus Sprint Planner",
            "Budget Pulse Tracker",
            "Habit Grid Coach",
            "Meal Prep Assistant",
            "Deep Work Timer",
            "Strength Logbook",
            "Inbox Zero Shortcut",
            "Photo Backup Vault",
            "Travel Itinerary Builder",
            "Sleep Rhythm Coach",
            "Language Daily Deck",
            "Reading Queue Manager",
        ],
        "phone-cases" => &[
            "Slim Armor Case",
            "Soft Touch Grip Case",
            "Kevlar Weave Shield",
            "Clear Matte Protector",
            "Magnetic Wallet Case",
            "Drop-Test Bumper",
            "Carbon Fiber Snap Case",
            "Leather Fold Case",
            "Dual-Layer Trail Case",
            "Anti-Yellow Crystal Case",
            "Camera Guard Case",
            "Eco Biopolymer Case",
        ],
        "clothes" => &[
            "Heavyweight White Tee",
            "Straight Utility Chino",
            "Merino Everyday Crew",
            "Packable Wind Jacket",
            "Relaxed Oxford Shirt",
            "Travel Cargo Pant",
            "Structured Overshirt",
            "Performance Knit Polo",
            "Wool Blend Hoodie",
            "Lightweight Rain Shell",
            "Rib Tank Layer",
            "Minimal Court Sneaker",
        ],
        "watches" => &[
            "Field Watch 38",
            "Chronograph Steel",
            "Solar Everyday Watch",
            "GMT Traveler",
            "Titanium Diver",
            "Rectangular Dress Watch",
            "Pilot Automatic",
            "Mesh Strap Quartz",
            "Minimal Mono Dial",
            "Dual Time Sport Watch",
            "Sapphire Tool Watch",
            "Classic Leather Watch",
        ],
        _ => &[],
    }
}

/// Inclusive `[min, max]` price band for a category.
#[must_use]
pub fn price_band(category: &str) -> (f64, f64) {
    match category {
        "grooming" => (14.0, 130.0),
        "tech" => (39.0, 749.0),
        "fitness" => (18.0, 320.0),
        "food" => (10.0, 220.0),
        "home-decor" => (16.0, 280.0),
        "phone-apps" => (3.0, 45.0),
        "phone-cases" => (12.0, 95.0),
        "clothes" => (24.0, 280.0),
        "watches" => (90.0, 950.0),
        _ => (10.0, 120.0),
    }
}

/// Brand pool cycled across a category's seed index.
#[must_use]
pub fn brand_pool(category: &str) -> &'static [&'static str] {
    match category {
        "grooming" => &["Aesop", "Muhle", "Baxter", "Henson"],
        "tech" => &["Sony", "Keychron", "Anker", "Belkin"],
        "fitness" => &["Rogue", "Hyperice", "Therabody", "Nike"],
        "food" => &["Fellow", "Misen", "Graza", "Stagg"],
        "home-decor" => &["Hay", "Muuto", "Ferm Living", "Menu"],
        "phone-apps" => &["Notion", "Calm", "Reeder", "Todoist"],
        "phone-cases" => &["Nomad", "Caudabe", "Spigen", "Mous"],
        "clothes" => &["COS", "Aime Leon Dore", "Norse Projects", "Uniqlo"],
        "watches" => &["Seiko", "Hamilton", "Tissot", "Baltic"],
        _ => &["Picks"],
    }
}

/// Image search query keywords for a category, folded into the image seed.
#[must_use]
pub fn image_query(category: &str) -> &'static str {
    match category {
        "grooming" => "grooming,flatlay,bathroom,product",
        "tech" => "technology,desk,workspace,product",
        "fitness" => "fitness,gym,training,gear",
        "food" => "kitchen,cooking,food,tools",
        "home-decor" => "interior,home,decor,minimal",
        "phone-apps" => "smartphone,app,mobile,screen",
        "phone-cases" => "phone,case,accessory,product",
        "clothes" => "fashion,clothing,minimal,outfit",
        "watches" => "watch,timepiece,wrist,product",
        _ => "product,lifestyle,minimal",
    }
}

/// Audience copy for a category; unknown categories get generic framing.
#[must_use]
pub fn audience_for_category(category: &str) -> CategoryAudience {
    match category {
        "grooming" => CategoryAudience {
            who_for: "People who want reliable daily grooming with minimal steps.",
            who_not_for: "Anyone looking for salon-grade or highly specialized routines.",
        },
        "tech" => CategoryAudience {
            who_for: "People optimizing desk performance and daily workflow speed.",
            who_not_for: "Users who prioritize niche pro-only features over simplicity.",
        },
        "fitness" => CategoryAudience {
            who_for: "People building a compact, repeatable home or travel training setup.",
            who_not_for: "Athletes needing full-size commercial gym equipment.",
        },
        "food" => CategoryAudience {
            who_for: "People who want practical kitchen utility without clutter.",
            who_not_for: "Home chefs seeking full professional kitchen complexity.",
        },
        "home-decor" => CategoryAudience {
            who_for: "People refining calm, durable spaces with fewer better pieces.",
            who_not_for: "Anyone redecorating around fast-trend statement items.",
        },
        "phone-apps" => CategoryAudience {
            who_for: "People who want focused daily utility from a small app stack.",
            who_not_for: "Power users needing broad app ecosystems and deep integrations.",
        },
        "phone-cases" => CategoryAudience {
            who_for: "People who want clean protection and dependable grip every day.",
            who_not_for: "Users prioritizing novelty materials over proven protection.",
        },
        "clothes" => CategoryAudience {
            who_for: "People building repeatable outfits with versatile staples.",
            who_not_for: "Shoppers looking for trend-first seasonal statement pieces.",
        },
        "watches" => CategoryAudience {
            who_for: "People who want an everyday watch rotation with clear roles.",
            who_not_for: "Collectors optimizing for rare complications or speculation.",
        },
        _ => CategoryAudience {
            who_for: "People who want fewer, better picks.",
            who_not_for: "Anyone needing highly specialized edge-case options.",
        },
    }
}

/// The base creator roster. Admin overrides patch these profiles by id.
#[must_use]
pub fn creator_roster() -> Vec<CreatorProfile> {
    let socials = || {
        vec![
            SocialLink { label: "Instagram".to_string(), url: "https://www.instagram.com/".to_string() },
            SocialLink { label: "X".to_string(), url: "https://x.com/".to_string() },
        ]
    };
    let picks = |ids: &[&str]| ids.iter().map(ToString::to_string).collect();

    vec![
        CreatorProfile {
            id: "sel-marco".to_string(),
            name: "Marco Velez".to_string(),
            role: "Product designer".to_string(),
            bio: "Desk performance and low-friction workflows.".to_string(),
            avatar: "https://i.pravatar.cc/120?img=12".to_string(),
            socials: socials(),
            picks: picks(&[
                "tech-02", "tech-04", "tech-07", "tech-12", "phone-apps-05", "phone-apps-07",
                "home-decor-04", "food-01", "watches-09", "clothes-07",
            ]),
            is_visible: true,
        },
        CreatorProfile {
            id: "sel-nia".to_string(),
            name: "Nia Brooks".to_string(),
            role: "Performance coach".to_string(),
            bio: "Training utility, recovery quality, and clean travel systems.".to_string(),
            avatar: "https://i.pravatar.cc/120?img=32".to_string(),
            socials: socials(),
            picks: picks(&[
                "fitness-01", "fitness-03", "fitness-07", "fitness-11", "grooming-10", "food-09",
                "clothes-04", "clothes-10", "phone-cases-05", "watches-03",
            ]),
            is_visible: true,
        },
        CreatorProfile {
            id: "sel-ryan".to_string(),
            name: "Ryan Okafor".to_string(),
            role: "Creative director".to_string(),
            bio: "Warm interiors, simple uniforms, and durable accessories.".to_string(),
            avatar: "https://i.pravatar.cc/120?img=56".to_string(),
            socials: socials(),
            picks: picks(&[
                "home-decor-01", "home-decor-02", "home-decor-05", "home-decor-10", "clothes-01",
                "clothes-05", "clothes-12", "food-11", "watches-01", "watches-06",
            ]),
            is_visible: true,
        },
    ]
}

#[must_use]
pub fn packs() -> &'static [Pack] {
    &[
        Pack {
            id: "pack-desk-reset",
            title: "Desk Reset Pack",
            slug: "desk-reset-pack",
            description: "A focused desk stack for cleaner workflow and less setup friction.",
            min_price: 420.0,
            max_price: 680.0,
            mindset_tag: "Setup mindset",
            products: &["tech-02", "tech-04", "tech-12", "home-decor-04", "home-decor-07", "phone-apps-05", "food-01"],
        },
        Pack {
            id: "pack-travel-clean",
            title: "Travel Clean Kit",
            slug: "travel-clean-kit",
            description: "Compact travel essentials for grooming, carry, and charging.",
            min_price: 180.0,
            max_price: 340.0,
            mindset_tag: "Setup mindset",
            products: &["grooming-01", "grooming-12", "clothes-04", "clothes-10", "phone-cases-05", "watches-03"],
        },
        Pack {
            id: "pack-home-lift",
            title: "Apartment Lift Pack",
            slug: "apartment-lift-pack",
            description: "Small home upgrades that improve daily function without clutter.",
            min_price: 310.0,
            max_price: 760.0,
            mindset_tag: "Setup mindset",
            products: &["home-decor-02", "home-decor-03", "home-decor-05", "home-decor-08", "home-decor-10", "food-11", "tech-09", "tech-11"],
        },
        Pack {
            id: "pack-daily-uniform",
            title: "Daily Uniform Pack",
            slug: "daily-uniform-pack",
            description: "A repeatable clothing-and-accessory baseline for every week.",
            min_price: 340.0,
            max_price: 780.0,
            mindset_tag: "Setup mindset",
            products: &["clothes-01", "clothes-03", "clothes-05", "clothes-12", "phone-cases-03", "watches-01"],
        },
        Pack {
            id: "pack-gym-bag-core",
            title: "Gym Bag Core Pack",
            slug: "gym-bag-core-pack",
            description: "Core training carry with recovery and hydration basics.",
            min_price: 160.0,
            max_price: 360.0,
            mindset_tag: "Setup mindset",
            products: &["fitness-02", "fitness-06", "fitness-08", "fitness-12", "grooming-12", "food-09"],
        },
        Pack {
            id: "pack-phone-clean",
            title: "Phone Clean Setup Pack",
            slug: "phone-clean-setup-pack",
            description: "A lean phone software + hardware stack for daily speed.",
            min_price: 80.0,
            max_price: 220.0,
            mindset_tag: "Setup mindset",
            products: &["phone-apps-01", "phone-apps-03", "phone-apps-07", "phone-cases-01", "phone-cases-05", "tech-08"],
        },
    ]
}

#[must_use]
pub fn guides() -> &'static [Guide] {
    &[
        Guide {
            id: "guide-01",
            title: "Build a Better Gym Bag Under $150",
            slug: "build-a-better-gym-bag-under-150",
            body: "A minimal carry list with one primary bag and six high-utility add-ons.",
            products: &["fitness-05", "fitness-06", "grooming-12"],
        },
        Guide {
            id: "guide-02",
            title: "Minimal Desk Upgrade in 30 Minutes",
            slug: "minimal-desk-upgrade-in-30-minutes",
            body: "Monitor, keyboard, lighting, and acoustic fixes that reduce visual noise.",
            products: &["tech-02", "tech-04", "home-decor-04"],
        },
        Guide {
            id: "guide-03",
            title: "Phone Setup That Stays Fast and Clean",
            slug: "phone-setup-that-stays-fast-and-clean",
            body: "Three apps, one case, and a weekly reset routine to keep your device useful.",
            products: &["phone-apps-01", "phone-apps-07", "phone-cases-01"],
        },
        Guide {
            id: "guide-04",
            title: "Starter Watch Rotation Under $500",
            slug: "starter-watch-rotation-under-500",
            body: "Field, sport, and dress options without overlap.",
            products: &["watches-01", "watches-03", "watches-06"],
        },
    ]
}

#[must_use]
pub fn collections() -> &'static [Collection] {
    &[
        Collection {
            id: "collection-starter-desk",
            title: "Starter Desk System",
            slug: "starter-desk-system",
            description: "Monitor, keyboard, task light, and workflow app stack.",
            products: &["tech-02", "tech-04", "home-decor-03", "phone-apps-01"],
        },
        Collection {
            id: "collection-weekend-carry",
            title: "Weekend Carry",
            slug: "weekend-carry",
            description: "Travel-ready uniform with compact grooming and charging.",
            products: &["clothes-04", "clothes-10", "grooming-12", "tech-07"],
        },
        Collection {
            id: "collection-kitchen-reset",
            title: "Kitchen Reset",
            slug: "kitchen-reset",
            description: "High-utility tools for coffee, prep, and fast weekday meals.",
            products: &["food-01", "food-03", "food-05", "food-10"],
        },
        Collection {
            id: "collection-min-watch-kit",
            title: "Minimal Watch Rotation",
            slug: "minimal-watch-rotation",
            description: "Field, dress, and sport options without overlap.",
            products: &["watches-01", "watches-06", "watches-11", "clothes-05"],
        },
    ]
}
