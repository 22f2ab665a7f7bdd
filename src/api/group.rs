use rocket::{response::status::Created, serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    group::{GroupCode, GroupStatus},
    preferences::UserPreferences,
};
use crate::store::SharedStore;

/// How many random codes to try before giving up on group creation.
/// With 36^6 possible codes this only matters under pathological load.
const MAX_CODE_ATTEMPTS: usize = 16;

pub fn routes() -> Vec<Route> {
    routes![create_group, get_group, get_status]
}

#[post("/group-trips", data = "<request>", format = "json")]
fn create_group(
    request: Json<CreateGroupRequest>,
    store: &State<SharedStore>,
) -> Result<Created<Json<CreateGroupResponse>>> {
    let expected_users = request.expected_users;
    if expected_users < 2 {
        return Err(Error::invalid_input(format!(
            "a group needs at least 2 people, got {expected_users}"
        )));
    }

    // The code space is large, so a collision means retry, not failure.
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = GroupCode::generate(&mut rng);
        match store.create(code.clone(), expected_users) {
            Ok(()) => {
                info!("Created group {code} for {expected_users} users");
                let location = format!("/group-trips/{code}");
                return Ok(Created::new(location)
                    .body(Json(CreateGroupResponse { group_code: code })));
            }
            Err(Error::Conflict(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(Error::Conflict(
        "could not allocate an unused group code".to_string(),
    ))
}

#[get("/group-trips/<code>")]
fn get_group(code: GroupCode, store: &State<SharedStore>) -> Result<Json<GroupView>> {
    let trip = store
        .get(&code)
        .ok_or_else(|| Error::not_found(format!("group '{code}'")))?;

    let mut users: Vec<UserPreferences> = trip.members.into_values().collect();
    users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    Ok(Json(GroupView {
        group_code: trip.code,
        expected_users: trip.expected_users,
        users,
    }))
}

/// Unknown groups report zero progress rather than an error, so clients can
/// poll this endpoint without special-casing a group that is still being set
/// up elsewhere.
#[get("/group-trips/<code>/status")]
fn get_status(code: GroupCode, store: &State<SharedStore>) -> Json<GroupStatus> {
    Json(store.status(&code))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupRequest {
    expected_users: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupResponse {
    group_code: GroupCode,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupView {
    group_code: GroupCode,
    expected_users: u32,
    users: Vec<UserPreferences>,
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

    fn create(client: &Client, expected_users: u32) -> GroupCode {
        let response = client
            .post("/group-trips")
            .header(ContentType::JSON)
            .body(json!({ "expectedUsers": expected_users }).to_string())
            .dispatch();
        assert_eq!(Status::Created, response.status());
        let body: CreateGroupResponse =
            serde_json::from_str(&response.into_string().unwrap()).unwrap();
        body.group_code
    }

    #[test]
    fn created_group_is_retrievable_and_empty() {
        let client = test_client();
        let code = create(&client, 3);

        let response = client.get(format!("/group-trips/{code}")).dispatch();
        assert_eq!(Status::Ok, response.status());
        let view: GroupView = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(view.group_code, code);
        assert_eq!(view.expected_users, 3);
        assert!(view.users.is_empty());
    }

    #[test]
    fn group_codes_are_case_insensitive_in_the_path() {
        let client = test_client();
        let code = create(&client, 2);

        let lowered = code.as_str().to_ascii_lowercase();
        let response = client.get(format!("/group-trips/{lowered}")).dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[test]
    fn undersized_group_is_rejected() {
        let client = test_client();
        let response = client
            .post("/group-trips")
            .header(ContentType::JSON)
            .body(json!({ "expectedUsers": 1 }).to_string())
            .dispatch();
        assert_eq!(Status::BadRequest, response.status());
    }

    #[test]
    fn unknown_group_is_not_found() {
        let client = test_client();
        let response = client.get("/group-trips/NOSUCH").dispatch();
        assert_eq!(Status::NotFound, response.status());
    }

    #[test]
    fn malformed_group_code_is_not_routed() {
        let client = test_client();
        let response = client.get("/group-trips/TOOLONGCODE").dispatch();
        assert_eq!(Status::NotFound, response.status());
    }

    #[test]
    fn status_of_unknown_group_is_degenerate_zeroes() {
        let client = test_client();
        let response = client.get("/group-trips/NOSUCH/status").dispatch();
        assert_eq!(Status::Ok, response.status());
        let status: GroupStatus = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(status, GroupStatus::unknown_group());
    }

    #[test]
    fn status_reflects_preference_submissions() {
        let client = test_client();
        let code = create(&client, 2);

        let submit = |user: &str| {
            let response = client
                .post(format!("/group-trips/{code}/preferences"))
                .header(ContentType::JSON)
                .body(
                    serde_json::to_string(&UserPreferences::example_completed(user)).unwrap(),
                )
                .dispatch();
            assert_eq!(Status::Ok, response.status());
        };

        submit("alice");
        let response = client.get(format!("/group-trips/{code}/status")).dispatch();
        let status: GroupStatus = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(status.completed, 1);
        assert_eq!(status.total, 2);
        assert!(!status.all_completed);

        submit("bob");
        let response = client.get(format!("/group-trips/{code}/status")).dispatch();
        let status: GroupStatus = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(status.completed, 2);
        assert!(status.all_completed);
    }
}
