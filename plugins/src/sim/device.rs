use std::any::Any;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use suitekit_core::api::Environment;

pub const MAX_BRIGHTNESS: u8 = 255;

pub const DEFAULT_APPS: &[&str] = &["Camera", "Chrome", "Clock", "Contacts", "Files", "Settings"];

/// One UI-level operation on the simulated device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimAction {
    SetWifi { on: bool },
    SetBluetooth { on: bool },
    SetBrightness { level: u8 },
    CopyText { text: String },
    SetTimer { hours: u32, minutes: u32, seconds: u32 },
    OpenApp { name: String },
    NavigateHome,
    Wait,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSetting {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

#[derive(Debug, Clone)]
pub struct SimDevice {
    pub wifi: bool,
    pub bluetooth: bool,
    pub brightness: u8,
    pub clipboard: String,
    pub timer: Option<TimerSetting>,
    pub foreground_app: Option<String>,
    installed_apps: Vec<String>,
    history: Vec<SimAction>,
}

impl Default for SimDevice {
    fn default() -> Self {
        Self {
            wifi: true,
            bluetooth: false,
            brightness: MAX_BRIGHTNESS / 2,
            clipboard: String::new(),
            timer: None,
            foreground_app: None,
            installed_apps: DEFAULT_APPS.iter().map(|s| s.to_string()).collect(),
            history: Vec::new(),
        }
    }
}

impl SimDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed_apps(&self) -> &[String] {
        &self.installed_apps
    }

    /// Every action applied since the device was created.
    pub fn history(&self) -> &[SimAction] {
        &self.history
    }

    pub fn is_home(&self) -> bool {
        self.foreground_app.is_none()
    }

    pub fn apply(&mut self, action: &SimAction) -> Result<()> {
        match action {
            SimAction::SetWifi { on } => self.wifi = *on,
            SimAction::SetBluetooth { on } => self.bluetooth = *on,
            SimAction::SetBrightness { level } => self.brightness = *level,
            SimAction::CopyText { text } => self.clipboard = text.clone(),
            SimAction::SetTimer {
                hours,
                minutes,
                seconds,
            } => {
                if *minutes >= 60 || *seconds >= 60 {
                    bail!("invalid timer {hours:02}:{minutes:02}:{seconds:02}");
                }
                self.timer = Some(TimerSetting {
                    hours: *hours,
                    minutes: *minutes,
                    seconds: *seconds,
                });
            }
            SimAction::OpenApp { name } => {
                if !self.installed_apps.iter().any(|app| app == name) {
                    bail!("app {name} is not installed");
                }
                self.foreground_app = Some(name.clone());
            }
            SimAction::NavigateHome => self.foreground_app = None,
            SimAction::Wait => {}
        }
        self.history.push(action.clone());
        Ok(())
    }
}

impl Environment for SimDevice {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Reach the simulated device behind an opaque environment handle.
pub fn device_mut(env: &mut dyn Environment) -> Result<&mut SimDevice> {
    env.downcast_mut::<SimDevice>()
        .ok_or_else(|| anyhow!("environment is not a simulated device"))
}

pub fn device_ref(env: &dyn Environment) -> Option<&SimDevice> {
    env.downcast_ref::<SimDevice>()
}
