//! Input device enumeration via cpal.

use cpal::traits::{DeviceTrait, HostTrait};

use sound_recorder_core::models::device::InputDevice;
use sound_recorder_core::models::error::RecorderError;

/// Enumerates audio input devices on the default host.
pub struct DeviceEnumerator {
    host: cpal::Host,
}

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// All input devices, with the system default flagged.
    pub fn list_input_devices(&self) -> Result<Vec<InputDevice>, RecorderError> {
        let default_name = self.host.default_input_device().and_then(|d| d.name().ok());
        let devices = self
            .host
            .input_devices()
            .map_err(|e| RecorderError::StreamFailed(format!("failed to enumerate devices: {e}")))?;

        let mut sources = Vec::new();
        for device in devices {
            // Devices that cannot report a name are not addressable.
            let Ok(name) = device.name() else { continue };
            let is_default = Some(&name) == default_name.as_ref();
            sources.push(InputDevice { name, is_default });
        }
        Ok(sources)
    }

    /// The system default input device, if any.
    pub fn default_input_device(&self) -> Option<InputDevice> {
        let device = self.host.default_input_device()?;
        let name = device.name().ok()?;
        Some(InputDevice {
            name,
            is_default: true,
        })
    }

    /// Resolve a device by name, or the system default when `name` is
    /// `None`.
    pub(crate) fn resolve(&self, name: Option<&str>) -> Result<cpal::Device, RecorderError> {
        match name {
            None => self
                .host
                .default_input_device()
                .ok_or(RecorderError::DeviceNotAvailable),
            Some(target) => {
                let devices = self
                    .host
                    .input_devices()
                    .map_err(|_| RecorderError::DeviceNotAvailable)?;
                for device in devices {
                    if device.name().map(|n| n == target).unwrap_or(false) {
                        return Ok(device);
                    }
                }
                Err(RecorderError::DeviceNotAvailable)
            }
        }
    }
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Device-dependent results vary by machine (CI hosts often have no
    // input at all), so these only pin down the failure modes.

    #[test]
    fn enumeration_never_panics() {
        let enumerator = DeviceEnumerator::new();
        let _ = enumerator.list_input_devices();
        let _ = enumerator.default_input_device();
    }

    #[test]
    fn resolving_unknown_device_fails() {
        let enumerator = DeviceEnumerator::new();
        assert!(enumerator
            .resolve(Some("no-such-device-4af1c2"))
            .is_err());
    }
}
