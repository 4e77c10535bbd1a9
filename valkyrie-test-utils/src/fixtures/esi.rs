//! ESI response bodies and mock endpoints.
//!
//! Bodies are built as raw JSON so they can be served both to the `eve_esi` client
//! (corporations, alliances) and to the plain HTTP lookups of universe data.

use mockito::Mock;
use serde_json::{json, Value};

use crate::TestSetup;

/// Corporation body as returned by `GET /corporations/{id}`.
pub fn mock_corporation(name: &str, alliance_id: Option<i64>) -> Value {
    json!({
        "alliance_id": alliance_id,
        "ceo_id": 2114794365,
        "creator_id": 2114794365,
        "date_founded": "2024-10-07T21:43:09Z",
        "home_station_id": 60003760,
        "member_count": 21,
        "name": name,
        "shares": 1000,
        "tax_rate": 0.0,
        "ticker": "TICK",
        "war_eligible": true
    })
}

/// Alliance body as returned by `GET /alliances/{id}`.
pub fn mock_alliance(name: &str) -> Value {
    json!({
        "creator_corporation_id": 98784257,
        "creator_id": 2114794365,
        "date_founded": "2024-09-25T06:25:58Z",
        "executor_corporation_id": 98787881,
        "name": name,
        "ticker": "ALLY"
    })
}

/// Item type body as returned by `GET /universe/types/{id}`.
pub fn mock_type(type_id: i64, name: &str, group_id: i64) -> Value {
    json!({
        "type_id": type_id,
        "name": name,
        "description": "",
        "group_id": group_id,
        "published": true
    })
}

/// Item group body as returned by `GET /universe/groups/{id}`.
pub fn mock_group(group_id: i64, name: &str, category_id: i64) -> Value {
    json!({
        "group_id": group_id,
        "name": name,
        "category_id": category_id,
        "published": true,
        "types": []
    })
}

/// Solar system body as returned by `GET /universe/systems/{id}`.
pub fn mock_system(system_id: i64, name: &str, star_id: Option<i64>) -> Value {
    json!({
        "system_id": system_id,
        "name": name,
        "star_id": star_id,
        "constellation_id": 20000001,
        "security_status": 0.45,
        "position": {"x": 0.0, "y": 0.0, "z": 0.0}
    })
}

/// Star body as returned by `GET /universe/stars/{id}`. `radius` is in meters.
pub fn mock_star(radius: i64, spectral_class: &str, type_id: i64, luminosity: f64) -> Value {
    json!({
        "age": 4_000_000_000i64,
        "luminosity": luminosity,
        "name": "Star",
        "radius": radius,
        "solar_system_id": 30000142,
        "spectral_class": spectral_class,
        "temperature": 5000,
        "type_id": type_id
    })
}

impl TestSetup {
    /// Create a mock GET endpoint returning `body` as JSON, expected `expected_requests`
    /// times.
    pub fn create_json_endpoint(&mut self, path: &str, body: &Value, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET endpoint failing with `status`.
    pub fn create_error_endpoint(&mut self, path: &str, status: usize, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"mock error"}"#)
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for corporation data.
    pub fn create_corporation_endpoint(
        &mut self,
        corporation_id: i64,
        name: &str,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/corporations/{}", corporation_id);
        self.create_json_endpoint(&url, &mock_corporation(name, None), expected_requests)
    }

    /// Create a mock endpoint for alliance data.
    pub fn create_alliance_endpoint(
        &mut self,
        alliance_id: i64,
        name: &str,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/alliances/{}", alliance_id);
        self.create_json_endpoint(&url, &mock_alliance(name), expected_requests)
    }

    /// Create a mock endpoint for item type data.
    pub fn create_type_endpoint(
        &mut self,
        type_id: i64,
        name: &str,
        group_id: i64,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/types/{}", type_id);
        self.create_json_endpoint(&url, &mock_type(type_id, name, group_id), expected_requests)
    }

    /// Create a mock endpoint for item group data.
    pub fn create_group_endpoint(
        &mut self,
        group_id: i64,
        name: &str,
        category_id: i64,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/groups/{}", group_id);
        self.create_json_endpoint(&url, &mock_group(group_id, name, category_id), expected_requests)
    }

    /// Create a mock endpoint for solar system data.
    pub fn create_system_endpoint(
        &mut self,
        system_id: i64,
        name: &str,
        star_id: Option<i64>,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/systems/{}", system_id);
        self.create_json_endpoint(&url, &mock_system(system_id, name, star_id), expected_requests)
    }

    /// Create a mock endpoint for star data.
    pub fn create_star_endpoint(
        &mut self,
        star_id: i64,
        body: &Value,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/stars/{}", star_id);
        self.create_json_endpoint(&url, body, expected_requests)
    }

    /// Create a mock RedisQ endpoint serving `body` verbatim.
    pub fn create_redisq_endpoint(&mut self, body: &str, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", "/listen.php")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create()
    }
}
