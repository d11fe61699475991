use uuid::Uuid;

use crate::{
    audit::{action, log_audit},
    db::DbPool,
    dto::bookings::{BookingList, CreateBookingRequest, UpdateBookingStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Booking,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

const VALID_STATUSES: [&str; 4] = ["pending", "confirmed", "completed", "cancelled"];

pub async fn create_booking(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    // The booked service must belong to the named merchant.
    let service: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM services WHERE id = $1 AND merchant_id = $2")
            .bind(payload.service_id)
            .bind(payload.merchant_id)
            .fetch_optional(pool)
            .await?;
    if service.is_none() {
        return Err(AppError::NotFound);
    }

    let booking: Booking = sqlx::query_as(
        r#"
        INSERT INTO bookings (id, customer_id, merchant_id, service_id, booking_date, booking_time, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.merchant_id)
    .bind(payload.service_id)
    .bind(payload.booking_date)
    .bind(payload.booking_time)
    .bind(payload.notes)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        action::BOOKING_CREATE,
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": booking.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking created",
        booking,
        Some(Meta::empty()),
    ))
}

/// Bookings the caller made as a customer.
pub async fn list_my_bookings(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = pagination.normalize();

    let items: Vec<Booking> = sqlx::query_as(
        r#"
        SELECT * FROM bookings
        WHERE customer_id = $1
        ORDER BY booking_date DESC, booking_time DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE customer_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(meta),
    ))
}

/// Bookings received by a merchant the caller owns.
pub async fn list_merchant_bookings(
    pool: &DbPool,
    user: &AuthUser,
    merchant_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<BookingList>> {
    ensure_merchant_owner(pool, user, merchant_id).await?;
    let (page, limit, offset) = pagination.normalize();

    let items: Vec<Booking> = sqlx::query_as(
        r#"
        SELECT * FROM bookings
        WHERE merchant_id = $1
        ORDER BY booking_date DESC, booking_time DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(merchant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE merchant_id = $1")
        .bind(merchant_id)
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(meta),
    ))
}

pub async fn update_booking_status(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBookingStatusRequest,
) -> AppResult<ApiResponse<Booking>> {
    if !VALID_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::BadRequest("Invalid booking status".into()));
    }

    let booking: Option<Booking> = sqlx::query_as("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    ensure_merchant_owner(pool, user, booking.merchant_id).await?;

    let updated: Booking =
        sqlx::query_as("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(payload.status)
            .fetch_one(pool)
            .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user.user_id),
        action::BOOKING_STATUS_UPDATE,
        Some("bookings"),
        Some(serde_json::json!({ "booking_id": updated.id, "status": updated.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Booking updated",
        updated,
        Some(Meta::empty()),
    ))
}

async fn ensure_merchant_owner(pool: &DbPool, user: &AuthUser, merchant_id: Uuid) -> AppResult<()> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM merchants WHERE id = $1 AND owner_id = $2")
            .bind(merchant_id)
            .bind(user.user_id)
            .fetch_optional(pool)
            .await?;
    if row.is_none() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
