use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_group_size_default")]
    default_group_size: u32,
    #[serde(default = "Config::suggestion_limit_default")]
    suggestion_limit: usize,
}

impl Config {
    /// Target size for a group that is created implicitly by a preference
    /// submission, i.e. without going through group creation first.
    /// Configured via `DEFAULT_GROUP_SIZE`.
    pub fn default_group_size(&self) -> u32 {
        self.default_group_size
    }

    /// Maximum number of candidate destinations offered to a group.
    /// Configured via `SUGGESTION_LIMIT`.
    pub fn suggestion_limit(&self) -> usize {
        self.suggestion_limit
    }

    fn default_group_size_default() -> u32 {
        4
    }

    fn suggestion_limit_default() -> usize {
        10
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for control over error messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!(
            "Loaded config: default group size {}, suggestion limit {}",
            config.default_group_size, config.suggestion_limit
        );

        rocket = rocket.manage(config);
        Ok(rocket)
    }
}
