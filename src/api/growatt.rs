mod error;
pub mod lenient;
mod models;
mod power;
mod response;
mod throttle;

use std::{
    ops::RangeInclusive,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use bon::bon;
use chrono::NaiveDate;
use http::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

pub use self::{
    error::ApiError,
    models::{Device, EnergyPoint, MinInverterData, Plant, PlantData, TimeUnit},
    power::DayPower,
};
use self::{
    models::{DeviceList, MinHistory, PlantEnergy, PlantList, PlantPower},
    response::Response,
    throttle::Throttle,
};
use crate::prelude::*;

pub const DEFAULT_BASE_URL: &str = "https://openapi.growatt.com/v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_secs(3);

/// Timezone of the inverter history when nothing else is configured.
pub const DEFAULT_TIMEZONE: &str = "US/Central";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Growatt OpenAPI v1 client.
pub struct Api {
    client: Client,
    base_url: Url,
    throttle: Throttle,
}

#[bon]
impl Api {
    #[builder]
    pub fn new(
        token: &str,
        base_url: Option<Url>,
        #[builder(default = DEFAULT_TIMEOUT)] timeout: Duration,
        #[builder(default = DEFAULT_RATE_LIMIT)] rate_limit: Duration,
    ) -> Result<Self> {
        let mut base_url = match base_url {
            Some(base_url) => base_url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        if !base_url.path().ends_with('/') {
            // Otherwise, `Url::join` would replace the last segment.
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let mut headers = HeaderMap::new();
        headers.append("token", HeaderValue::from_str(token)?);
        let client = Client::builder()
            .user_agent("meerkat")
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base_url, throttle: Throttle::new(rate_limit) })
    }
}

impl Api {
    #[instrument(skip_all)]
    pub async fn list_plants(&self) -> Result<Vec<Plant>> {
        info!("fetching…");
        let list: PlantList =
            self.get("plant/list", &()).await.context("failed to list the plants")?;
        info!(n_plants = list.plants.len(), "fetched");
        Ok(list.plants)
    }

    #[instrument(skip_all, fields(plant_id = plant_id))]
    pub async fn get_plant_details(&self, plant_id: &str) -> Result<Plant> {
        self.get("plant/details", &PlantRequest { plant_id })
            .await
            .context("failed to get the plant details")
    }

    #[instrument(skip_all, fields(plant_id = plant_id))]
    pub async fn get_plant_data(&self, plant_id: &str) -> Result<PlantData> {
        self.get("plant/data", &PlantRequest { plant_id })
            .await
            .context("failed to get the plant data")
    }

    /// Five-minute power readings of the entire plant.
    #[instrument(skip_all, fields(plant_id = plant_id, date = %date))]
    pub async fn get_plant_power(&self, plant_id: &str, date: NaiveDate) -> Result<DayPower> {
        #[derive(Serialize)]
        struct GetPlantPowerRequest<'a> {
            plant_id: &'a str,
            date: String,
        }

        info!("fetching…");
        let power: PlantPower = self
            .get(
                "plant/power",
                &GetPlantPowerRequest { plant_id, date: date.format(DATE_FORMAT).to_string() },
            )
            .await
            .context("failed to get the plant power")?;
        let day = DayPower::from_points(date, power.powers.0);
        info!(n_samples = day.samples.len(), "fetched");
        Ok(day)
    }

    pub async fn get_plant_power_range(
        &self,
        plant_id: &str,
        dates: RangeInclusive<NaiveDate>,
        should_terminate: &AtomicBool,
    ) -> Result<Vec<DayPower>> {
        fetch_days(dates, should_terminate, async |date| self.get_plant_power(plant_id, date).await)
            .await
    }

    #[instrument(skip_all, fields(plant_id = plant_id, time_unit = ?time_unit))]
    pub async fn get_plant_energy(
        &self,
        plant_id: &str,
        dates: RangeInclusive<NaiveDate>,
        time_unit: TimeUnit,
    ) -> Result<Vec<EnergyPoint>> {
        #[derive(Serialize)]
        struct GetPlantEnergyRequest<'a> {
            plant_id: &'a str,
            start_date: String,
            end_date: String,
            time_unit: TimeUnit,
        }

        let request = GetPlantEnergyRequest {
            plant_id,
            start_date: dates.start().format(time_unit.date_format()).to_string(),
            end_date: dates.end().format(time_unit.date_format()).to_string(),
            time_unit,
        };
        let energy: PlantEnergy = self
            .get("plant/energy", &request)
            .await
            .context("failed to get the plant energy")?;
        Ok(energy.datas.into_iter().map(|(date, energy)| EnergyPoint { date, energy }).collect())
    }

    #[instrument(skip_all, fields(plant_id = plant_id))]
    pub async fn list_devices(&self, plant_id: &str) -> Result<Vec<Device>> {
        info!("fetching…");
        let list: DeviceList = self
            .get("device/list", &PlantRequest { plant_id })
            .await
            .context("failed to list the devices")?;
        info!(n_devices = list.devices.len(), "fetched");
        Ok(list.devices)
    }

    #[instrument(skip_all, fields(serial_number = serial_number))]
    pub async fn get_inverter_details(&self, serial_number: &str) -> Result<MinInverterData> {
        #[derive(Serialize)]
        struct GetInverterDetailsRequest<'a> {
            #[serde(rename = "tlx_sn")]
            serial_number: &'a str,
        }

        self.get("device/tlx/tlx_data_info", &GetInverterDetailsRequest { serial_number })
            .await
            .context("failed to get the inverter details")
    }

    /// AC output power history of a MIN (TLX) inverter over one day.
    #[instrument(skip_all, fields(serial_number = serial_number, date = %date))]
    pub async fn get_inverter_history(
        &self,
        serial_number: &str,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<DayPower> {
        #[derive(Serialize)]
        struct GetInverterHistoryRequest<'a> {
            #[serde(rename = "tlx_sn")]
            serial_number: &'a str,

            start_date: &'a str,
            end_date: &'a str,

            #[serde(rename = "timezone_id")]
            timezone: &'a str,

            page: u32,

            /// The API refuses anything above 100.
            #[serde(rename = "perpage")]
            per_page: u32,
        }

        info!("fetching…");
        let date_string = date.format(DATE_FORMAT).to_string();
        let request = GetInverterHistoryRequest {
            serial_number,
            start_date: &date_string,
            end_date: &date_string,
            timezone: if timezone.is_empty() { DEFAULT_TIMEZONE } else { timezone },
            page: 1,
            per_page: 100,
        };
        let history: MinHistory = self
            .post_form("device/tlx/tlx_data", &request)
            .await
            .context("failed to get the inverter history")?;
        let day = DayPower::from_points(
            date,
            history.datas.into_iter().map(|point| (point.time, point.ac_power)),
        );
        info!(n_samples = day.samples.len(), "fetched");
        Ok(day)
    }

    pub async fn get_inverter_history_range(
        &self,
        serial_number: &str,
        dates: RangeInclusive<NaiveDate>,
        timezone: &str,
        should_terminate: &AtomicBool,
    ) -> Result<Vec<DayPower>> {
        fetch_days(dates, should_terminate, async |date| {
            self.get_inverter_history(serial_number, date, timezone).await
        })
        .await
    }

    async fn get<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.get(self.base_url.join(path)?).query(query);
        self.call(path, request).await
    }

    async fn post_form<F, R>(&self, path: &str, form: &F) -> Result<R>
    where
        F: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.base_url.join(path)?).form(form);
        self.call(path, request).await
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(path = path))]
    async fn call<R: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<R> {
        self.throttle.wait().await;
        let response = Result::<serde_json::Value, ApiError>::from(
            request
                .send()
                .await
                .with_context(|| format!("failed to call `{path}`"))?
                .error_for_status()
                .with_context(|| format!("`{path}` failed"))?
                .json::<Response>()
                .await
                .with_context(|| format!("failed to deserialize `{path}` response JSON"))?,
        )
        .inspect_err(|error| {
            if error.is_rate_limited() {
                warn!("Growatt is throttling the requests, consider increasing `--rate-limit`");
            } else if error.is_permission_denied() {
                warn!("the token has no access to the resource");
            } else if error.is_plant_not_found() {
                warn!("check `--plant-id`");
            }
        })?;
        debug!(?response, "call succeeded");
        serde_json::from_value(response)
            .with_context(|| format!("failed to deserialize `{path}` response structure"))
    }
}

#[derive(Serialize)]
struct PlantRequest<'a> {
    plant_id: &'a str,
}

/// Fetch the inclusive date range day by day, checking the termination flag before each day.
#[instrument(skip_all, fields(since = %dates.start(), until = %dates.end()))]
async fn fetch_days(
    dates: RangeInclusive<NaiveDate>,
    should_terminate: &AtomicBool,
    fetch: impl AsyncFn(NaiveDate) -> Result<DayPower>,
) -> Result<Vec<DayPower>> {
    let (since, until) = dates.into_inner();
    let mut days = Vec::new();
    for date in since.iter_days().take_while(|date| *date <= until) {
        ensure!(!should_terminate.load(Ordering::Relaxed), "interrupted before {date}");
        days.push(fetch(date).await.with_context(|| format!("failed to fetch {date}"))?);
    }
    Ok(days)
}
