use rocket::{serde::json::Json, Route, State};

use crate::config::Config;
use crate::error::Result;
use crate::model::{
    group::{GroupCode, GroupStatus},
    preferences::UserPreferences,
};
use crate::store::SharedStore;

pub fn routes() -> Vec<Route> {
    routes![submit_preferences]
}

/// Submit (or wholly resubmit) one member's preferences. A submission to a
/// group nobody has created yet implicitly creates it with the configured
/// default size, matching the organizer-less join flow.
///
/// Responds with the group's updated status so clients can skip a follow-up
/// poll.
#[post("/group-trips/<code>/preferences", data = "<preferences>", format = "json")]
fn submit_preferences(
    code: GroupCode,
    preferences: Json<UserPreferences>,
    store: &State<SharedStore>,
    config: &State<Config>,
) -> Result<Json<GroupStatus>> {
    let preferences = preferences.into_inner();
    preferences.validate()?;

    let user_id = preferences.user_id.clone();
    store.upsert_preferences(&code, preferences, config.default_group_size())?;
    info!("Stored preferences for user {user_id} in group {code}");

    Ok(Json(store.status(&code)))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::blocking::Client,
        serde::json::{json, serde_json},
    };

    use super::*;
    use crate::test_client;

    fn submit(client: &Client, code: &str, preferences: &UserPreferences) -> (Status, String) {
        let response = client
            .post(format!("/group-trips/{code}/preferences"))
            .header(ContentType::JSON)
            .body(serde_json::to_string(preferences).unwrap())
            .dispatch();
        let status = response.status();
        (status, response.into_string().unwrap_or_default())
    }

    #[test]
    fn submission_to_unknown_group_creates_it_with_the_default_size() {
        let client = test_client();
        let (status, body) = submit(&client, "FRESH1", &UserPreferences::example("alice"));
        assert_eq!(Status::Ok, status);

        let group_status: GroupStatus = serde_json::from_str(&body).unwrap();
        // Configured default size is 4 (see Rocket.toml).
        assert_eq!(group_status.total, 4);
        assert_eq!(group_status.completed, 0);
    }

    #[test]
    fn resubmission_replaces_the_previous_record() {
        let client = test_client();
        submit(&client, "REDO01", &UserPreferences::example("alice"));
        let (status, body) = submit(
            &client,
            "REDO01",
            &UserPreferences::example_completed("alice"),
        );
        assert_eq!(Status::Ok, status);

        let group_status: GroupStatus = serde_json::from_str(&body).unwrap();
        assert_eq!(group_status.members.len(), 1);
        assert_eq!(group_status.completed, 1);
    }

    #[test]
    fn inverted_budget_is_rejected_at_the_boundary() {
        let client = test_client();
        let mut preferences = UserPreferences::example("alice");
        preferences.budget.min = 900;
        preferences.budget.max = 100;

        let (status, _) = submit(&client, "BADBUD", &preferences);
        assert_eq!(Status::BadRequest, status);

        // The rejected submission must not have created a member.
        let response = client.get("/group-trips/BADBUD/status").dispatch();
        let group_status: GroupStatus =
            serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert!(group_status.members.is_empty());
    }

    #[test]
    fn reversed_dates_are_rejected_at_the_boundary() {
        let client = test_client();
        let (status, _) = submit(
            &client,
            "BADDAT",
            &serde_json::from_value(json!({
                "userId": "alice",
                "from": "Manchester",
                "destinationIdeas": [],
                "dates": { "start": "2026-06-19", "end": "2026-06-12" },
                "interests": [],
                "budget": { "min": 0, "max": 100, "currency": "EUR" },
                "completed": true
            }))
            .unwrap(),
        );
        assert_eq!(Status::BadRequest, status);
    }

    #[test]
    fn blank_user_id_is_rejected() {
        let client = test_client();
        let mut preferences = UserPreferences::example("alice");
        preferences.user_id = "   ".to_string();
        let (status, _) = submit(&client, "BLANKU", &preferences);
        assert_eq!(Status::BadRequest, status);
    }

    #[test]
    fn extra_members_beyond_the_group_size_are_rejected() {
        let client = test_client();
        let code = "FULL01";
        // Implicit creation with default size 4.
        for user in ["alice", "bob", "carol", "dave"] {
            let (status, _) = submit(&client, code, &UserPreferences::example(user));
            assert_eq!(Status::Ok, status);
        }

        let (status, _) = submit(&client, code, &UserPreferences::example("eve"));
        assert_eq!(Status::Conflict, status);
    }
}
