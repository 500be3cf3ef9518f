use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::growatt::{Device, EnergyPoint, MinInverterData, Plant, PlantData},
    quantity::{energy::KilowattHours, power::Watts},
    statistics::DailyStatistics,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn status_cell(status: i64) -> Cell {
    Cell::new(status).fg(if status == 1 { Color::Green } else { Color::DarkYellow })
}

fn power_cell(power: Watts) -> Cell {
    Cell::new(power).set_alignment(CellAlignment::Right).fg(if power > Watts::ZERO {
        Color::Green
    } else {
        Color::DarkGrey
    })
}

fn energy_cell(energy: KilowattHours) -> Cell {
    Cell::new(energy).set_alignment(CellAlignment::Right)
}

pub fn build_plants_table(plants: &[Plant]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID", "Name", "Location", "Peak", "Power", "Today", "Total", "Status", "Created",
    ]);
    for plant in plants {
        table.add_row(vec![
            Cell::new(&plant.id).add_attribute(Attribute::Bold),
            Cell::new(&plant.name),
            Cell::new(format!("{}, {}", plant.city, plant.country)).add_attribute(Attribute::Dim),
            Cell::new(format!("{:.1} kW", plant.peak_power)).set_alignment(CellAlignment::Right),
            power_cell(plant.current_power),
            energy_cell(plant.today_energy),
            energy_cell(plant.total_energy),
            status_cell(plant.status),
            Cell::new(&plant.created_at).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_devices_table(devices: &[Device]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Serial number", "Name", "Type", "Model", "Status", "Last update"]);
    for device in devices {
        table.add_row(vec![
            Cell::new(&device.serial_number).add_attribute(Attribute::Bold),
            Cell::new(&device.name),
            Cell::new(device.kind).set_alignment(CellAlignment::Right),
            Cell::new(&device.model),
            status_cell(device.status),
            Cell::new(&device.last_updated_at).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_plant_data_table(data: &PlantData) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Power", "Peak today", "Today", "Month", "Year", "Total"]);
    table.add_row(vec![
        power_cell(data.current_power),
        power_cell(data.today_peak_power),
        energy_cell(data.today_energy),
        energy_cell(data.month_energy),
        energy_cell(data.year_energy),
        energy_cell(data.total_energy),
    ]);
    table
}

pub fn build_energy_table(points: &[EnergyPoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Energy"]);
    for point in points {
        table.add_row(vec![Cell::new(&point.date), energy_cell(point.energy)]);
    }
    table
}

pub fn build_inverter_table(data: &MinInverterData) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Serial number", data.serial_number.clone()),
        ("Status", data.status.to_string()),
        ("AC power", data.ac_power.to_string()),
        ("Today", data.today_energy.to_string()),
        ("Total", data.total_energy.to_string()),
        ("PV1", format!("{:.1} V, {:.2} A", data.vpv1, data.ipv1)),
        ("PV2", format!("{:.1} V, {:.2} A", data.vpv2, data.ipv2)),
        ("Grid", format!("{:.1} V, {:.2} A, {:.2} Hz", data.vac1, data.iac1, data.frequency)),
        ("Temperature", format!("{:.1} °C", data.temperature)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![
            Cell::new(metric).add_attribute(Attribute::Dim),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// One row per exported day.
pub fn build_days_table(days: &[DailyStatistics]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Active hours", "Samples", "Mean power", "Energy"]);
    for day in days {
        let n_active_hours = day.hours.iter().filter(|hour| !hour.is_idle()).count();
        let n_samples = day.hours.iter().map(|hour| hour.n_samples()).sum::<usize>();
        table.add_row(vec![
            Cell::new(day.date.format("%b %d")).add_attribute(Attribute::Bold),
            Cell::new(n_active_hours).set_alignment(CellAlignment::Right),
            Cell::new(n_samples).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            power_cell(day.mean_active_power()),
            energy_cell(day.estimated_energy()),
        ]);
    }
    table
}
