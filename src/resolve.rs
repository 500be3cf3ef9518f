//! Picking the plant and the device when they are not configured explicitly.

use async_trait::async_trait;

use crate::{
    api::growatt::{Api, Device, Plant},
    prelude::*,
};

pub const PLANT_ID_ENV: &str = "GROWATT_PLANT_ID";
pub const DEVICE_SN_ENV: &str = "GROWATT_DEVICE_SN";

#[async_trait]
pub trait PlantDirectory: Sync {
    async fn list_plants(&self) -> Result<Vec<Plant>>;

    async fn list_devices(&self, plant_id: &str) -> Result<Vec<Device>>;
}

#[async_trait]
impl PlantDirectory for Api {
    async fn list_plants(&self) -> Result<Vec<Plant>> {
        Self::list_plants(self).await
    }

    async fn list_devices(&self, plant_id: &str) -> Result<Vec<Device>> {
        Self::list_devices(self, plant_id).await
    }
}

/// Use the configured plant ID, or auto-detect the only plant of the account.
#[instrument(skip_all)]
pub async fn resolve_plant_id(
    directory: &impl PlantDirectory,
    plant_id: Option<String>,
) -> Result<String> {
    if let Some(plant_id) = plant_id.filter(|plant_id| !plant_id.is_empty()) {
        return Ok(plant_id);
    }

    info!("no plant ID specified, checking the available plants…");
    let plants = directory.list_plants().await.context("failed to list the plants")?;
    let plant = only_plant(&plants)?;
    info!(plant_id = %plant.id, plant_name = %plant.name, "auto-detected the plant");
    info!("set `{PLANT_ID_ENV}={}` to skip the auto-detection", plant.id);
    Ok(plant.id.clone())
}

/// The only plant of the account, or an error listing the candidates.
pub fn only_plant(plants: &[Plant]) -> Result<&Plant> {
    match plants {
        [] => bail!("no plants found for this account"),
        [plant] => Ok(plant),
        plants => {
            for plant in plants {
                warn!(plant_id = %plant.id, plant_name = %plant.name, "found");
            }
            bail!(
                "multiple plants found; specify --plant-id or set {PLANT_ID_ENV} environment variable"
            )
        }
    }
}

/// Use the configured device serial number, or auto-detect the only device of the plant.
#[instrument(skip_all)]
pub async fn resolve_device_sn(
    directory: &impl PlantDirectory,
    device_sn: Option<String>,
    plant_id: Option<String>,
) -> Result<String> {
    if let Some(device_sn) = device_sn.filter(|device_sn| !device_sn.is_empty()) {
        return Ok(device_sn);
    }

    let plant_id = resolve_plant_id(directory, plant_id).await?;
    info!(%plant_id, "fetching the device list…");
    let mut devices =
        directory.list_devices(&plant_id).await.context("failed to list the devices")?;
    match devices.len() {
        0 => bail!("no devices found for plant {plant_id}"),
        1 => {
            let device = devices.swap_remove(0);
            info!(
                serial_number = %device.serial_number,
                device_name = %device.name,
                "auto-detected the device",
            );
            info!("set `{DEVICE_SN_ENV}={}` to skip the auto-detection", device.serial_number);
            Ok(device.serial_number)
        }
        _ => {
            for device in &devices {
                warn!(
                    serial_number = %device.serial_number,
                    device_name = %device.name,
                    device_type = device.kind,
                    "found",
                );
            }
            bail!(
                "multiple devices found; specify --device-sn or set {DEVICE_SN_ENV} environment variable"
            )
        }
    }
}
