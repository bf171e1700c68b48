//! Init data fixtures

#![allow(dead_code)]

use minihack::InitData;
use serde_json::json;

/// Token the auth endpoint tests sign with
pub const BOT_TOKEN: &str = "7000000000:TEST-ONLY-TOKEN";

/// Test user ID (consistent across tests)
pub const TEST_USER_ID: i64 = 279058397;

/// initDataUnsafe as a Telegram client hands it to the page
pub fn sample_init_data() -> InitData {
    InitData::new()
        .with("query_id", "AAHdF6IQAAAAAN0XohDhrOrc")
        .with(
            "user",
            json!({
                "id": TEST_USER_ID,
                "first_name": "Vladislav",
                "last_name": "Kibenko",
                "username": "vdkfrost",
                "language_code": "ru",
            }),
        )
        .with("auth_date", "1662771648")
}
