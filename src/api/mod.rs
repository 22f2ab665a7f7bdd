use rocket::Route;

mod group;
mod preferences;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(group::routes());
    routes.extend(preferences::routes());
    routes.extend(voting::routes());
    routes
}
