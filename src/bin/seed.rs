use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use pet_marketplace_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", "admin").await?;
    let owner_id = ensure_user(
        &pool,
        "merchant@example.com",
        "merchant123",
        "Pet Shop Owner",
        "merchant",
    )
    .await?;
    let customer_id = ensure_user(
        &pool,
        "customer@example.com",
        "customer123",
        "Sample Customer",
        "customer",
    )
    .await?;

    let merchant_id = ensure_merchant(&pool, owner_id).await?;
    seed_catalog(&pool, merchant_id).await?;
    seed_categories(&pool).await?;

    println!(
        "Seed completed. Admin: {admin_id}, Owner: {owner_id}, Customer: {customer_id}, Merchant: {merchant_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    full_name: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, full_name)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    sqlx::query(
        r#"
        INSERT INTO user_roles (id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_merchant(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM merchants WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind("Happy Paws")
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO merchants (id, owner_id, name, category, city, address, description, verified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind("Happy Paws")
    .bind("pet_shop")
    .bind("Jakarta")
    .bind("Jl. Sudirman No. 1")
    .bind("Pet shop and grooming studio")
    .fetch_one(pool)
    .await?;

    println!("Seeded merchant Happy Paws");
    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool, merchant_id: Uuid) -> anyhow::Result<()> {
    let products = [
        ("Premium Dog Food 5kg", "Grain-free dry food", 350000_i64, 40),
        ("Cat Scratching Post", "Sisal rope, 90cm", 220000, 15),
        ("Chew Toy Bundle", "Assorted rubber toys", 85000, 60),
    ];
    for (name, desc, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, merchant_id, name, description, price, stock)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (
                SELECT 1 FROM products WHERE merchant_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(merchant_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    let services = [
        ("Full Grooming", "Bath, trim and nail care", 150000_i64, 90),
        ("Nail Trim", "Quick nail trim", 50000, 20),
    ];
    for (name, desc, price, duration) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, merchant_id, name, description, price, duration_minutes)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (
                SELECT 1 FROM services WHERE merchant_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(merchant_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(duration)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}

async fn seed_categories(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Dog Food", "product"),
        ("Cat Food", "product"),
        ("Toys", "product"),
        ("Grooming", "service"),
        ("Veterinary", "service"),
        ("Pet Shop", "merchant"),
        ("Clinic", "merchant"),
    ];
    for (name, kind) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, type)
            VALUES ($1, $2, $3)
            ON CONFLICT (name, type) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(kind)
        .execute(pool)
        .await?;
    }

    println!("Seeded categories");
    Ok(())
}
