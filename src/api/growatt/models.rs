use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    api::growatt::lenient::{Identifier, Lenient, PowerSeries},
    quantity::{energy::KilowattHours, power::Watts},
};

#[derive(Deserialize)]
pub struct PlantList {
    #[serde(default)]
    pub plants: Vec<Plant>,
}

#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Plant {
    #[serde_as(as = "Identifier")]
    #[serde(rename = "plant_id", default)]
    pub id: String,

    #[serde(rename = "plant_name", default)]
    pub name: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,

    /// Installed capacity, in kilowatts.
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub peak_power: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub current_power: Watts,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub today_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub total_energy: KilowattHours,

    #[serde(rename = "create_date", default)]
    pub created_at: String,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub status: i64,
}

/// Production overview of a plant.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct PlantData {
    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub current_power: Watts,

    #[serde_as(as = "Lenient")]
    #[serde(rename = "peak_power_today", default)]
    pub today_peak_power: Watts,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub today_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub month_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub year_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub total_energy: KilowattHours,
}

#[derive(Deserialize)]
pub struct PlantPower {
    #[serde(default)]
    pub powers: PowerSeries,
}

#[serde_as]
#[derive(Deserialize)]
pub struct PlantEnergy {
    #[serde_as(as = "BTreeMap<_, Lenient>")]
    #[serde(default)]
    pub datas: BTreeMap<String, KilowattHours>,
}

/// Produced energy over a day or a month.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnergyPoint {
    /// `YYYY-MM-DD` or `YYYY-MM`, depending on the requested time unit.
    pub date: String,

    pub energy: KilowattHours,
}

#[derive(Copy, Clone, Debug, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Month,
}

impl TimeUnit {
    pub const fn date_format(self) -> &'static str {
        match self {
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
        }
    }
}

#[derive(Deserialize)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct Device {
    #[serde_as(as = "Identifier")]
    #[serde(rename = "device_sn", default)]
    pub serial_number: String,

    #[serde_as(as = "Lenient")]
    #[serde(rename = "device_type", default)]
    pub kind: i64,

    #[serde(rename = "device_name", default)]
    pub name: String,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub status: i64,

    #[serde(default)]
    pub model: String,

    #[serde(rename = "last_update", default)]
    pub last_updated_at: String,
}

/// Real-time readings of a MIN (TLX) inverter.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub struct MinInverterData {
    #[serde_as(as = "Identifier")]
    #[serde(rename = "tlx_sn", default)]
    pub serial_number: String,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub status: i64,

    /// AC output power.
    #[serde_as(as = "Lenient")]
    #[serde(rename = "pac", default)]
    pub ac_power: Watts,

    #[serde_as(as = "Lenient")]
    #[serde(rename = "etoday", default)]
    pub today_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(rename = "etotal", default)]
    pub total_energy: KilowattHours,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub vpv1: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub vpv2: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub ipv1: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub ipv2: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub vac1: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub iac1: f64,

    /// Grid frequency, in hertz.
    #[serde_as(as = "Lenient")]
    #[serde(rename = "fac", default)]
    pub frequency: f64,

    #[serde_as(as = "Lenient")]
    #[serde(default)]
    pub temperature: f64,
}

#[derive(Deserialize)]
pub struct MinHistory {
    #[serde(default)]
    pub datas: Vec<MinHistoryPoint>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct MinHistoryPoint {
    #[serde(default)]
    pub time: String,

    #[serde_as(as = "Lenient")]
    #[serde(rename = "pac", default)]
    pub ac_power: f64,
}
