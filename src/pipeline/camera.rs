//! Capture device enumeration. Frame acquisition and landmark detection
//! happen in the external detector; this only tells the user which device
//! indices the detector can be pointed at.

use anyhow::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraDevice {
    pub index: String,
    pub label: String,
}

impl CameraDevice {
    pub fn describe(&self) -> String {
        format!("camera {}: {}", self.index, self.label)
    }
}

#[cfg(feature = "camera-nokhwa")]
pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    use nokhwa::{
        query,
        utils::{ApiBackend, CameraInfo},
    };

    fn format_camera_label(info: &CameraInfo) -> String {
        let description = info.description();
        if description.is_empty() {
            info.human_name()
        } else {
            format!("{} ({description})", info.human_name())
        }
    }

    let cameras = query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().to_string(),
            label: format_camera_label(&info),
        })
        .collect())
}

#[cfg(not(feature = "camera-nokhwa"))]
pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    anyhow::bail!("camera support is disabled; rebuild with the `camera-nokhwa` feature")
}
