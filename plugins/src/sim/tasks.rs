//! Simulated task templates.
//!
//! Two registries: `system_registry` (device settings) and `apps_registry`
//! (app-level tasks). The factory composes them into the runnable families.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use suitekit_core::api::{
    Environment, Params, TaskInstance, TaskRegistry, TaskTemplate, TerminationFn,
};

use super::device::{device_mut, device_ref, TimerSetting, DEFAULT_APPS, MAX_BRIGHTNESS};

pub const WIFI_ON: &str = "SystemWifiTurnOn";
pub const WIFI_OFF: &str = "SystemWifiTurnOff";
pub const BLUETOOTH_ON: &str = "SystemBluetoothTurnOn";
pub const BLUETOOTH_OFF: &str = "SystemBluetoothTurnOff";
pub const BRIGHTNESS_MAX: &str = "SystemBrightnessMax";
pub const BRIGHTNESS_MIN: &str = "SystemBrightnessMin";
pub const COPY_TO_CLIPBOARD: &str = "SystemCopyToClipboard";
pub const WIFI_OFF_BLUETOOTH_ON: &str = "TurnOffWifiAndTurnOnBluetooth";
pub const CLOCK_TIMER_ENTRY: &str = "ClockTimerEntry";
pub const OPEN_APP: &str = "OpenAppTaskEval";

const CLIPBOARD_PHRASES: &[&str] = &[
    "grocery list",
    "meeting at noon",
    "call the dentist",
    "flight AZ 610",
    "wifi password hunter2",
];

fn success(ok: bool) -> f64 {
    if ok {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn param_str<'a>(params: &'a Params, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("missing string param {key}"))
}

pub(crate) fn param_u32(params: &Params, key: &str) -> Result<u32> {
    params
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| anyhow!("missing integer param {key}"))
}

#[derive(Debug, Clone, Copy)]
enum Radio {
    Wifi,
    Bluetooth,
}

/// Turn a radio on or off. The device starts in the opposite state.
struct ToggleRadio {
    name: &'static str,
    radio: Radio,
    on: bool,
}

impl ToggleRadio {
    fn label(&self) -> &'static str {
        match self.radio {
            Radio::Wifi => "WiFi",
            Radio::Bluetooth => "Bluetooth",
        }
    }
}

#[async_trait]
impl TaskTemplate for ToggleRadio {
    fn name(&self) -> &str {
        self.name
    }

    fn complexity(&self) -> f64 {
        1.0
    }

    fn generate_params(&self, _rng: &mut StdRng) -> Result<Params> {
        Ok(Params::new())
    }

    fn goal(&self, _params: &Params) -> String {
        let state = if self.on { "on" } else { "off" };
        format!("Turn {} {}.", self.label(), state)
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        let device = device_mut(env)?;
        match self.radio {
            Radio::Wifi => device.wifi = !self.on,
            Radio::Bluetooth => device.bluetooth = !self.on,
        }
        Ok(())
    }

    async fn is_successful(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let device = device_mut(env)?;
        let state = match self.radio {
            Radio::Wifi => device.wifi,
            Radio::Bluetooth => device.bluetooth,
        };
        Ok(success(state == self.on))
    }
}

struct Brightness {
    name: &'static str,
    max: bool,
}

#[async_trait]
impl TaskTemplate for Brightness {
    fn name(&self) -> &str {
        self.name
    }

    fn complexity(&self) -> f64 {
        1.0
    }

    fn generate_params(&self, _rng: &mut StdRng) -> Result<Params> {
        Ok(Params::new())
    }

    fn goal(&self, _params: &Params) -> String {
        let end = if self.max { "max" } else { "min" };
        format!("Turn brightness to the {end} value.")
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.brightness = MAX_BRIGHTNESS / 2;
        Ok(())
    }

    async fn is_successful(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let target = if self.max { MAX_BRIGHTNESS } else { 0 };
        Ok(success(device_mut(env)?.brightness == target))
    }
}

struct CopyToClipboard;

#[async_trait]
impl TaskTemplate for CopyToClipboard {
    fn name(&self) -> &str {
        COPY_TO_CLIPBOARD
    }

    fn complexity(&self) -> f64 {
        1.0
    }

    fn generate_params(&self, rng: &mut StdRng) -> Result<Params> {
        let phrase = CLIPBOARD_PHRASES
            .choose(rng)
            .ok_or_else(|| anyhow!("no clipboard phrases"))?;
        let mut params = Params::new();
        params.insert("clipboard_content".into(), Value::from(*phrase));
        Ok(params)
    }

    fn goal(&self, params: &Params) -> String {
        let content = param_str(params, "clipboard_content").unwrap_or_default();
        format!("Copy the following text to the clipboard: {content}")
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.clipboard.clear();
        Ok(())
    }

    async fn is_successful(&self, instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let expected = param_str(&instance.params, "clipboard_content")?;
        Ok(success(device_mut(env)?.clipboard == expected))
    }

    async fn tear_down(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.clipboard.clear();
        Ok(())
    }
}

struct WifiOffBluetoothOn;

#[async_trait]
impl TaskTemplate for WifiOffBluetoothOn {
    fn name(&self) -> &str {
        WIFI_OFF_BLUETOOTH_ON
    }

    fn complexity(&self) -> f64 {
        1.5
    }

    fn generate_params(&self, _rng: &mut StdRng) -> Result<Params> {
        Ok(Params::new())
    }

    fn goal(&self, _params: &Params) -> String {
        "Turn off WiFi, then enable bluetooth".to_string()
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        let device = device_mut(env)?;
        device.wifi = true;
        device.bluetooth = false;
        Ok(())
    }

    async fn is_successful(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let device = device_mut(env)?;
        Ok(success(!device.wifi && device.bluetooth))
    }
}

struct ClockTimerEntry;

#[async_trait]
impl TaskTemplate for ClockTimerEntry {
    fn name(&self) -> &str {
        CLOCK_TIMER_ENTRY
    }

    fn complexity(&self) -> f64 {
        1.2
    }

    fn generate_params(&self, rng: &mut StdRng) -> Result<Params> {
        let mut params = Params::new();
        params.insert("hours".into(), Value::from(rng.gen_range(0..24u32)));
        params.insert("minutes".into(), Value::from(rng.gen_range(0..60u32)));
        params.insert("seconds".into(), Value::from(rng.gen_range(0..60u32)));
        Ok(params)
    }

    fn goal(&self, params: &Params) -> String {
        let h = param_u32(params, "hours").unwrap_or_default();
        let m = param_u32(params, "minutes").unwrap_or_default();
        let s = param_u32(params, "seconds").unwrap_or_default();
        format!("Create a timer with {h} hours, {m} minutes, and {s} seconds. Do not start the timer.")
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.timer = None;
        Ok(())
    }

    async fn is_successful(&self, instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let expected = TimerSetting {
            hours: param_u32(&instance.params, "hours")?,
            minutes: param_u32(&instance.params, "minutes")?,
            seconds: param_u32(&instance.params, "seconds")?,
        };
        Ok(success(device_mut(env)?.timer.as_ref() == Some(&expected)))
    }

    async fn tear_down(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.timer = None;
        Ok(())
    }
}

/// Launch an app from the home screen. The episode ends as soon as any app
/// reaches the foreground.
struct OpenApp;

#[async_trait]
impl TaskTemplate for OpenApp {
    fn name(&self) -> &str {
        OPEN_APP
    }

    fn complexity(&self) -> f64 {
        1.0
    }

    fn start_on_home_screen(&self) -> bool {
        true
    }

    fn generate_params(&self, rng: &mut StdRng) -> Result<Params> {
        let app = DEFAULT_APPS
            .choose(rng)
            .ok_or_else(|| anyhow!("no apps to open"))?;
        let mut params = Params::new();
        params.insert("app_name".into(), Value::from(*app));
        Ok(params)
    }

    fn goal(&self, params: &Params) -> String {
        let app = param_str(params, "app_name").unwrap_or_default();
        format!("Open the {app} app. Clear any pop-ups that may appear by granting all permissions that are required.")
    }

    async fn initialize(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.foreground_app = None;
        Ok(())
    }

    async fn is_successful(&self, instance: &TaskInstance, env: &mut dyn Environment) -> Result<f64> {
        let expected = param_str(&instance.params, "app_name")?;
        Ok(success(
            device_mut(env)?.foreground_app.as_deref() == Some(expected),
        ))
    }

    async fn tear_down(&self, _instance: &TaskInstance, env: &mut dyn Environment) -> Result<()> {
        device_mut(env)?.foreground_app = None;
        Ok(())
    }

    fn termination_fn(&self) -> Option<TerminationFn> {
        Some(Arc::new(|env: &dyn Environment| {
            device_ref(env).is_some_and(|device| !device.is_home())
        }))
    }
}

pub fn system_registry() -> Result<TaskRegistry> {
    let templates: Vec<Arc<dyn TaskTemplate>> = vec![
        Arc::new(ToggleRadio {
            name: WIFI_ON,
            radio: Radio::Wifi,
            on: true,
        }),
        Arc::new(ToggleRadio {
            name: WIFI_OFF,
            radio: Radio::Wifi,
            on: false,
        }),
        Arc::new(ToggleRadio {
            name: BLUETOOTH_ON,
            radio: Radio::Bluetooth,
            on: true,
        }),
        Arc::new(ToggleRadio {
            name: BLUETOOTH_OFF,
            radio: Radio::Bluetooth,
            on: false,
        }),
        Arc::new(Brightness {
            name: BRIGHTNESS_MAX,
            max: true,
        }),
        Arc::new(Brightness {
            name: BRIGHTNESS_MIN,
            max: false,
        }),
        Arc::new(CopyToClipboard),
        Arc::new(WifiOffBluetoothOn),
    ];
    let mut registry = TaskRegistry::new();
    for template in templates {
        registry.register(template)?;
    }
    Ok(registry)
}

pub fn apps_registry() -> Result<TaskRegistry> {
    Ok(TaskRegistry::new()
        .with(Arc::new(ClockTimerEntry))?
        .with(Arc::new(OpenApp))?)
}
