//! Profiles command implementation.

use std::io::Write;

use crate::commands::Context;
use crate::error::CliError;
use crate::output::{OutputFormat, ProfileList};

/// Handler for the profiles command.
pub struct ProfilesCommand<'a> {
    ctx: &'a Context,
}

impl<'a> ProfilesCommand<'a> {
    /// Creates a new profiles command handler.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Executes the profiles command.
    pub fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let registry = self.ctx.config.registry();
        let output = ProfileList {
            default_profile: registry.default_profile().map(str::to_string),
            profiles: registry.profiles().to_vec(),
        };
        format.write(out, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::config::ParalogConfig;
    use paralog_core::LogLocations;

    #[test]
    fn lists_registry_profiles_with_default() {
        let config = ParalogConfig::from_json(
            r#"{"default_profile": "prod", "profiles": [
                {"name": "local", "type": "Local"},
                {"name": "prod", "type": "MJS"}
            ]}"#,
        )
        .expect("config");
        let ctx = Context::with_locations(config, LogLocations::new("/unused"));
        let mut out = Vec::new();

        ProfilesCommand::new(&ctx)
            .execute(&mut out, &OutputFormat::new(Format::Json))
            .expect("profiles");

        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(json["default_profile"], "prod");
        assert_eq!(json["profiles"][0]["name"], "local");
        assert_eq!(json["profiles"][1]["type"], "MJS");
    }
}
