pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Turns on the request diagnostics middleware.
        #[serde(default)]
        pub debug: bool,
        #[serde(default = "default_max_per_page")]
        pub max_per_page: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_builder(
                config::Config::builder().add_source(config::Environment::default()),
            )
        }

        /// Builds the configuration from an already assembled set of sources.
        pub fn from_builder(
            builder: config::ConfigBuilder<config::builder::DefaultState>,
        ) -> anyhow::Result<Self> {
            let settings = builder.build()?;
            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_max_per_page() -> u64 {
        100
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn can_apply_defaults_when_only_db_url_is_set() {
            let builder = config::Config::builder()
                .set_override("db_url", "sqlite::memory:")
                .unwrap();

            let config = Config::from_builder(builder).unwrap();

            assert_eq!(config.db_url, "sqlite::memory:");
            assert_eq!(config.port, 8080);
            assert!(!config.debug);
            assert_eq!(config.max_per_page, 100);
        }

        #[test]
        fn can_read_string_values_like_environment_variables() {
            let builder = config::Config::builder()
                .set_override("db_url", "postgres://localhost/todo")
                .unwrap()
                .set_override("port", "3000")
                .unwrap()
                .set_override("debug", "true")
                .unwrap()
                .set_override("max_per_page", "25")
                .unwrap();

            let config = Config::from_builder(builder).unwrap();

            assert_eq!(config.port, 3000);
            assert!(config.debug);
            assert_eq!(config.max_per_page, 25);
        }

        #[test]
        fn cannot_load_without_db_url() {
            let builder = config::Config::builder()
                .set_override("port", "3000")
                .unwrap();

            assert!(Config::from_builder(builder).is_err());
        }
    }
}
pub mod entities;
pub mod item;
pub mod list;
pub mod pagination;
pub mod web;
