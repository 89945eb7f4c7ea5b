//! Deterministic mock catalog in the raw API shape.
//!
//! Output mirrors what the REST API sends (Mongo-style `_id`, prices as
//! numbers or numeric strings, populated references), so it exercises the
//! normalizers end to end. The same seed always yields the same catalog.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::{Value, json};

use crate::resource::Resource;

/// Category name, description, and the noun used in product names.
const CATEGORIES: [(&str, &str, &str); 6] = [
    ("Jeans", "Denim cut for every day", "Jeans"),
    ("Shirts", "Button-downs and oxfords", "Shirt"),
    ("T-Shirts", "Soft cotton basics", "Tee"),
    ("Jackets", "Layers for cold mornings", "Jacket"),
    ("Dresses", "Day to evening dresses", "Dress"),
    ("Shoes", "Sneakers, boots and loafers", "Sneaker"),
];
const ADJECTIVES: [&str; 8] = [
    "Classic", "Slim", "Relaxed", "Vintage", "Organic", "Oversized", "Cropped", "Tailored",
];
const COLORS: [&str; 8] = [
    "Black", "White", "Navy", "Blue", "Red", "Green", "Beige", "Grey",
];
const SIZES: [&str; 6] = ["XS", "S", "M", "L", "XL", "XXL"];
const STYLES: [&str; 4] = ["Casual", "Formal", "Streetwear", "Sport"];
const FIRST_NAMES: [&str; 8] = [
    "Jane", "Omar", "Mei", "Lucas", "Priya", "Noah", "Ana", "Kofi",
];
const LAST_NAMES: [&str; 8] = [
    "Doe", "Haddad", "Chen", "Silva", "Patel", "Smith", "Kowalski", "Mensah",
];
const COMMENTS: [&str; 5] = [
    "Fits perfectly, great quality.",
    "Runs a little small.",
    "Color is exactly like the photos.",
    "Fabric feels cheap for the price.",
    "Would buy again.",
];
const REVIEW_STATUSES: [&str; 3] = ["approved", "pending", "flagged"];
const ORDER_STATUSES: [&str; 5] = ["pending", "processing", "shipped", "delivered", "cancelled"];
const PAYMENT_METHODS: [&str; 3] = ["card", "paypal", "cod"];
const CITIES: [(&str, &str); 4] = [
    ("Austin", "TX"),
    ("Portland", "OR"),
    ("Denver", "CO"),
    ("Boston", "MA"),
];

/// 2024-01-01T00:00:00Z; generated timestamps fall within the following year.
const EPOCH_SECS: i64 = 1_704_067_200;
const DAY_SECS: i64 = 86_400;

/// Raw mock records for every catalog resource.
#[derive(Debug, Clone, Serialize)]
pub struct MockCatalog {
    pub categories: Vec<Value>,
    pub products: Vec<Value>,
    pub reviews: Vec<Value>,
    pub orders: Vec<Value>,
}

impl MockCatalog {
    /// Generate `count` products plus matching categories, reviews and orders.
    #[must_use]
    pub fn generate(seed: u64, count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let categories: Vec<Value> = CATEGORIES
            .iter()
            .map(|(name, description, _)| {
                json!({
                    "_id": object_id(&mut rng),
                    "name": name,
                    "description": description,
                    "image": format!("/images/categories/{}.jpg", slug::slugify(name)),
                    "productCount": 0,
                })
            })
            .collect();

        let mut counts = vec![0_u32; categories.len()];
        let products: Vec<Value> = (0..count)
            .map(|i| {
                let category = rng.random_range(0..categories.len());
                if let Some(n) = counts.get_mut(category) {
                    *n += 1;
                }
                let noun = CATEGORIES.get(category).map_or("Piece", |c| c.2);
                product(&mut rng, i, categories.get(category), noun)
            })
            .collect();

        let categories = categories
            .into_iter()
            .zip(counts)
            .map(|(mut category, n)| {
                category["productCount"] = json!(n);
                category
            })
            .collect();

        let reviews = products
            .iter()
            .flat_map(|p| {
                let n = rng.random_range(0..3);
                (0..n).map(|_| review(&mut rng, p)).collect::<Vec<_>>()
            })
            .collect();

        let orders = (0..count.div_ceil(2))
            .map(|_| order(&mut rng, &products))
            .collect();

        Self {
            categories,
            products,
            reviews,
            orders,
        }
    }

    /// Records for `resource`. Coupons and users are not generated.
    #[must_use]
    pub fn records(&self, resource: Resource) -> &[Value] {
        match resource {
            Resource::Products => &self.products,
            Resource::Categories => &self.categories,
            Resource::Reviews => &self.reviews,
            Resource::Orders => &self.orders,
            Resource::Coupons | Resource::Users => &[],
        }
    }
}

fn product(rng: &mut StdRng, index: usize, category: Option<&Value>, noun: &str) -> Value {
    let category_name = category
        .and_then(|c| c["name"].as_str())
        .unwrap_or("Uncategorized");
    let adjective = pick(rng, &ADJECTIVES);
    let color = pick(rng, &COLORS);
    let name = format!("{adjective} {color} {noun}");

    let price = Decimal::new(rng.random_range(1_500..20_000), 2);
    let on_sale = rng.random_bool(0.3);
    let original_price = on_sale.then(|| price * Decimal::new(rng.random_range(120..200), 2));

    let color_count = rng_len(rng, 1, 3);
    let colors: Vec<&str> = COLORS.choose_multiple(rng, color_count).copied().collect();
    let size_count = rng_len(rng, 2, 5);
    let sizes: Vec<&str> = SIZES.choose_multiple(rng, size_count).copied().collect();
    let stock = if rng.random_bool(0.15) { 0 } else { rng.random_range(1..60) };

    // Alternate number and string encodings the way the real API does.
    let price = if index % 2 == 0 {
        json!(price.to_f64())
    } else {
        json!(price.to_string())
    };

    json!({
        "_id": object_id(rng),
        "name": name,
        "description": format!("{name}, part of our {category_name} collection."),
        "price": price,
        "originalPrice": original_price.map(|p| p.round_dp(2).to_string()),
        "stock": stock,
        "images": [
            {"url": format!("/images/products/{index}-1.jpg")},
            format!("/images/products/{index}-2.jpg"),
        ],
        "colors": colors,
        "sizes": sizes.join(","),
        "category": category.cloned().unwrap_or(Value::Null),
        "style": pick(rng, &STYLES),
        "rating": f64::from(rng.random_range(30_u8..=50)) / 10.0,
        "numReviews": rng.random_range(0..200),
        "createdAt": timestamp(rng),
    })
}

fn review(rng: &mut StdRng, product: &Value) -> Value {
    let (name, email) = person(rng);
    json!({
        "_id": object_id(rng),
        "product": {"_id": product["_id"], "name": product["name"]},
        "user": {"name": name, "email": email},
        "rating": rng.random_range(1..=5),
        "comment": pick(rng, &COMMENTS),
        "status": pick(rng, &REVIEW_STATUSES),
        "createdAt": timestamp(rng),
    })
}

fn order(rng: &mut StdRng, products: &[Value]) -> Value {
    let lines = rng_len(rng, 1, 3);
    let chosen: Vec<&Value> = products.choose_multiple(rng, lines).collect();
    let items: Vec<Value> = chosen
        .into_iter()
        .map(|p| {
            json!({
                "product": p["_id"],
                "name": p["name"],
                "quantity": rng.random_range(1..=3),
                "price": p["price"],
            })
        })
        .collect();

    let (name, email) = person(rng);
    let (city, state) = CITIES.choose(rng).copied().unwrap_or(("Austin", "TX"));

    json!({
        "_id": object_id(rng),
        "items": items,
        "customer": {
            "name": name,
            "email": email,
            "phone": format!("555-{:04}", rng.random_range(0..10_000)),
            "address": {
                "street": format!("{} Main St", rng.random_range(1..999)),
                "city": city,
                "state": state,
                "zipCode": format!("{:05}", rng.random_range(10_000..99_999)),
                "country": "US",
            },
        },
        "paymentMethod": pick(rng, &PAYMENT_METHODS),
        "status": pick(rng, &ORDER_STATUSES),
        "shipping": "4.99",
        "createdAt": timestamp(rng),
    })
}

fn person(rng: &mut StdRng) -> (String, String) {
    let first = pick(rng, &FIRST_NAMES);
    let last = pick(rng, &LAST_NAMES);
    (
        format!("{first} {last}"),
        format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
    )
}

/// 24 hex characters, like a Mongo `ObjectId`.
fn object_id(rng: &mut StdRng) -> String {
    let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
    id.simple().to_string().chars().take(24).collect()
}

fn timestamp(rng: &mut StdRng) -> Option<String> {
    let offset = rng.random_range(0..365) * DAY_SECS + rng.random_range(0..DAY_SECS);
    DateTime::<Utc>::from_timestamp(EPOCH_SECS + offset, 0).map(|dt| dt.to_rfc3339())
}

fn pick(rng: &mut StdRng, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

fn rng_len(rng: &mut StdRng, min: usize, max: usize) -> usize {
    rng.random_range(min..=max)
}
