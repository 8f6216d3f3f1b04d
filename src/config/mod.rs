mod cli;
mod file;

pub use cli::{Cli, Command};

use crate::device::DeviceProfile;
use crate::display::{Filter, RenderParams};
use crate::input::pump::InputSettings;
use crate::input::touch::TouchMapping;
use crate::orientation::Orientation;

const DEFAULT_WAIT_TIMEOUT_MS: u64 = 500;

/// Merged configuration from CLI args, TOML file and device profile.
#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    pub password: Option<String>,
    pub key_device: String,
    pub touch_device: String,
    pub grab_input: bool,
    pub orientation: Orientation,
    pub release_debounce: bool,
    pub filter: Filter,
    pub wait_timeout_ms: u64,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    pub fn load(cli: &Cli, device: &DeviceProfile) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        Self::merge(cli, file_config, device)
    }

    fn merge(cli: &Cli, file_config: file::FileConfig, device: &DeviceProfile) -> Self {
        Self {
            address: cli.address.clone().unwrap_or_default(),
            password: cli.password.clone().or(file_config.password),
            key_device: cli
                .key_device
                .clone()
                .unwrap_or_else(|| file_config.key_device.unwrap_or(device.key_device.into())),
            touch_device: cli
                .touch_device
                .clone()
                .unwrap_or_else(|| file_config.touch_device.unwrap_or(device.touch_device.into())),
            grab_input: !cli.no_grab && file_config.grab_input.unwrap_or(true),
            orientation: cli
                .orientation
                .or(file_config.orientation)
                .unwrap_or(device.touch_orientation),
            release_debounce: !cli.no_release_debounce
                && file_config.release_debounce.unwrap_or(device.release_debounce),
            filter: cli.filter.or(file_config.filter).unwrap_or_default(),
            wait_timeout_ms: cli
                .wait_timeout_ms
                .or(file_config.wait_timeout_ms)
                .unwrap_or(DEFAULT_WAIT_TIMEOUT_MS),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.address.trim().is_empty() {
            return Err("No remote address given");
        }
        if self.wait_timeout_ms == 0 {
            return Err("wait_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn input_settings(&self, device: &DeviceProfile) -> InputSettings {
        InputSettings {
            key_device: self.key_device.clone(),
            touch_device: self.touch_device.clone(),
            grab: self.grab_input,
            touch_slots: device.touch_slots,
            mapping: TouchMapping {
                orientation: self.orientation,
                ..TouchMapping::from_profile(device)
            },
            release_debounce: self.release_debounce,
        }
    }

    pub fn render_params(&self, device: &DeviceProfile) -> RenderParams {
        RenderParams {
            angle_degrees: device.rotation_degrees,
            aspect: 1.0,
            filter: self.filter,
            panel_width: device.panel_width,
            panel_height: device.panel_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::device::HANDHELD;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vnc-pad").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_come_from_device_profile() {
        let config = Config::merge(&cli(&["10.0.0.2:5900"]), file::FileConfig::default(), &HANDHELD);
        assert_eq!(config.address, "10.0.0.2:5900");
        assert_eq!(config.key_device, "/dev/input/event1");
        assert_eq!(config.touch_device, "/dev/input/event7");
        assert!(config.grab_input);
        assert!(config.release_debounce);
        assert_eq!(config.orientation, Orientation::LandscapeRight);
        assert_eq!(config.filter, Filter::Pixel);
        assert_eq!(config.wait_timeout_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file_config = file::FileConfig {
            touch_device: Some("/dev/input/event5".into()),
            orientation: Some(Orientation::Portrait),
            filter: Some(Filter::Blur),
            ..Default::default()
        };
        let config = Config::merge(
            &cli(&["host:1", "--orientation", "inverted", "--no-grab", "--no-release-debounce"]),
            file_config,
            &HANDHELD,
        );
        assert_eq!(config.touch_device, "/dev/input/event5");
        assert_eq!(config.orientation, Orientation::Inverted);
        assert_eq!(config.filter, Filter::Blur);
        assert!(!config.grab_input);
        assert!(!config.release_debounce);
    }

    #[test]
    fn test_missing_address_fails_validation() {
        let config = Config::merge(&cli(&[]), file::FileConfig::default(), &HANDHELD);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extra_positional_is_rejected() {
        assert!(Cli::try_parse_from(["vnc-pad", "a:1", "b:2"]).is_err());
    }

    #[test]
    fn test_input_settings_use_configured_orientation() {
        let config = Config::merge(&cli(&["h:1", "--orientation", "portrait"]), file::FileConfig::default(), &HANDHELD);
        let settings = config.input_settings(&HANDHELD);
        assert_eq!(settings.mapping.orientation, Orientation::Portrait);
        assert_eq!(settings.mapping.axis_max, 1000);
        assert_eq!(settings.touch_slots, 10);
    }
}
