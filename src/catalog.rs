//! Static sensor definitions, per device type.

use crate::model::DeviceType;
use std::collections::HashMap;

pub const ENERGY_KILO_WATT_HOUR: &str = "kWh";
pub const POWER_WATT: &str = "W";
pub const POWER_KILO_WATT: &str = "kW";
pub const ELECTRICAL_CURRENT_AMPERE: &str = "A";
pub const FREQUENCY_HERTZ: &str = "Hz";
pub const TEMP_CELSIUS: &str = "°C";
pub const VOLT: &str = "V";
pub const PERCENTAGE: &str = "%";
pub const VOLT_AMPERE: &str = "VA";
pub const EURO: &str = "€";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Power,
    Temperature,
    Battery,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Power => "power",
            DeviceClass::Temperature => "temperature",
            DeviceClass::Battery => "battery",
        }
    }
}

/// One reported measurement: `field` is the vendor field name inside the device snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub field: &'static str,
    pub round: Option<u32>,
    pub class: Option<DeviceClass>,
}

impl SensorDefinition {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        unit: &'static str,
        field: &'static str,
    ) -> SensorDefinition {
        SensorDefinition {
            key,
            name,
            unit,
            field,
            round: None,
            class: None,
        }
    }

    pub const fn round(mut self, precision: u32) -> SensorDefinition {
        self.round = Some(precision);
        self
    }

    pub const fn class(mut self, class: DeviceClass) -> SensorDefinition {
        self.class = Some(class);
        self
    }
}

/// Ordered sensor definitions keyed by device type. Built once and handed to setup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<DeviceType, Vec<SensorDefinition>>,
}

impl Catalog {
    pub fn new(tables: HashMap<DeviceType, Vec<SensorDefinition>>) -> Catalog {
        Catalog { tables }
    }

    /// The vendor's full sensor set.
    pub fn growatt() -> Catalog {
        let tables = [
            (DeviceType::Total, TOTAL),
            (DeviceType::Inverter, INVERTER),
            (DeviceType::Storage, STORAGE),
            (DeviceType::Mix, MIX),
            (DeviceType::Tlx, TLX),
        ]
        .iter()
        .map(|(device_type, table)| (*device_type, table.to_vec()))
        .collect();

        Catalog { tables }
    }

    pub fn sensors(&self, device_type: DeviceType) -> &[SensorDefinition] {
        self.tables
            .get(&device_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use DeviceClass::{Battery, Power, Temperature};

#[rustfmt::skip]
const TOTAL: &[SensorDefinition] = &[
    SensorDefinition::new("total_money_today", "Total money today", EURO, "plantMoneyText"),
    SensorDefinition::new("total_money_total", "Money lifetime", EURO, "totalMoneyText"),
    SensorDefinition::new("total_energy_today", "Energy Today", ENERGY_KILO_WATT_HOUR, "todayEnergy"),
    SensorDefinition::new("total_output_power", "Output Power", POWER_WATT, "invTodayPpv").class(Power),
    SensorDefinition::new("total_energy_output", "Lifetime energy output", ENERGY_KILO_WATT_HOUR, "totalEnergy"),
    SensorDefinition::new("total_maximum_output", "Maximum power", POWER_WATT, "nominalPower").class(Power),
];

#[rustfmt::skip]
const INVERTER: &[SensorDefinition] = &[
    SensorDefinition::new("inverter_energy_today", "Energy today", ENERGY_KILO_WATT_HOUR, "powerToday").round(1),
    SensorDefinition::new("inverter_energy_total", "Lifetime energy output", ENERGY_KILO_WATT_HOUR, "powerTotal").round(1),
    SensorDefinition::new("inverter_voltage_input_1", "Input 1 voltage", VOLT, "vpv1").round(2),
    SensorDefinition::new("inverter_amperage_input_1", "Input 1 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv1").round(1),
    SensorDefinition::new("inverter_wattage_input_1", "Input 1 Wattage", POWER_WATT, "ppv1").class(Power).round(1),
    SensorDefinition::new("inverter_voltage_input_2", "Input 2 voltage", VOLT, "vpv2").round(1),
    SensorDefinition::new("inverter_amperage_input_2", "Input 2 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv2").round(1),
    SensorDefinition::new("inverter_wattage_input_2", "Input 2 Wattage", POWER_WATT, "ppv2").class(Power).round(1),
    SensorDefinition::new("inverter_voltage_input_3", "Input 3 voltage", VOLT, "vpv3").round(1),
    SensorDefinition::new("inverter_amperage_input_3", "Input 3 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv3").round(1),
    SensorDefinition::new("inverter_wattage_input_3", "Input 3 Wattage", POWER_WATT, "ppv3").class(Power).round(1),
    SensorDefinition::new("inverter_internal_wattage", "Internal wattage", POWER_WATT, "ppv").class(Power).round(1),
    SensorDefinition::new("inverter_reactive_voltage", "Reactive voltage", VOLT, "vacr").round(1),
    SensorDefinition::new("inverter_inverter_reactive_amperage", "Reactive amperage", ELECTRICAL_CURRENT_AMPERE, "iacr").round(1),
    SensorDefinition::new("inverter_frequency", "AC frequency", FREQUENCY_HERTZ, "fac").round(1),
    SensorDefinition::new("inverter_current_wattage", "Output power", POWER_WATT, "pac").class(Power).round(1),
    SensorDefinition::new("inverter_current_reactive_wattage", "Reactive wattage", POWER_WATT, "pacr").class(Power).round(1),
    SensorDefinition::new("inverter_ipm_temperature", "Intelligent Power Management temperature", TEMP_CELSIUS, "ipmTemperature").class(Temperature).round(1),
    SensorDefinition::new("inverter_temperature", "Temperature", TEMP_CELSIUS, "temperature").class(Temperature).round(1),
];

#[rustfmt::skip]
const STORAGE: &[SensorDefinition] = &[
    SensorDefinition::new("storage_storage_production_today", "Storage production today", ENERGY_KILO_WATT_HOUR, "eBatDisChargeToday"),
    SensorDefinition::new("storage_storage_production_lifetime", "Lifetime Storage production", ENERGY_KILO_WATT_HOUR, "eBatDisChargeTotal"),
    SensorDefinition::new("storage_grid_discharge_today", "Grid discharged today", ENERGY_KILO_WATT_HOUR, "eacDisChargeToday"),
    SensorDefinition::new("storage_load_consumption_today", "Load consumption today", ENERGY_KILO_WATT_HOUR, "eopDischrToday"),
    SensorDefinition::new("storage_load_consumption_lifetime", "Lifetime load consumption", ENERGY_KILO_WATT_HOUR, "eopDischrTotal"),
    SensorDefinition::new("storage_grid_charged_today", "Grid charged today", ENERGY_KILO_WATT_HOUR, "eacChargeToday"),
    SensorDefinition::new("storage_charge_storage_lifetime", "Lifetime storaged charged", ENERGY_KILO_WATT_HOUR, "eChargeTotal"),
    SensorDefinition::new("storage_solar_production", "Solar power production", POWER_WATT, "ppv").class(Power),
    SensorDefinition::new("storage_battery_percentage", "Battery percentage", PERCENTAGE, "capacity").class(Battery),
    SensorDefinition::new("storage_power_flow", "Storage charging/ discharging(-ve)", POWER_WATT, "pCharge").class(Power),
    SensorDefinition::new("storage_load_consumption_solar_storage", "Load consumption(Solar + Storage)", VOLT_AMPERE, "rateVA"),
    SensorDefinition::new("storage_charge_today", "Charge today", ENERGY_KILO_WATT_HOUR, "eChargeToday"),
    SensorDefinition::new("storage_import_from_grid", "Import from grid", POWER_WATT, "pAcInPut").class(Power),
    SensorDefinition::new("storage_import_from_grid_today", "Import from grid today", ENERGY_KILO_WATT_HOUR, "eToUserToday"),
    SensorDefinition::new("storage_import_from_grid_total", "Import from grid total", ENERGY_KILO_WATT_HOUR, "eToUserTotal"),
    SensorDefinition::new("storage_load_consumption", "Load consumption", POWER_WATT, "outPutPower").class(Power),
    SensorDefinition::new("storage_grid_voltage", "AC input voltage", VOLT, "vGrid").round(2),
    SensorDefinition::new("storage_pv_charging_voltage", "PV charging voltage", VOLT, "vpv").round(2),
    SensorDefinition::new("storage_ac_input_frequency_out", "AC input frequency", FREQUENCY_HERTZ, "freqOutPut").round(2),
    SensorDefinition::new("storage_output_voltage", "Output voltage", VOLT, "outPutVolt").round(2),
    SensorDefinition::new("storage_ac_output_frequency", "Ac output frequency", FREQUENCY_HERTZ, "freqGrid").round(2),
    SensorDefinition::new("storage_current_PV", "Solar charge current", ELECTRICAL_CURRENT_AMPERE, "iAcCharge").round(2),
    SensorDefinition::new("storage_current_1", "Solar current to storage", ELECTRICAL_CURRENT_AMPERE, "iChargePV1").round(2),
    SensorDefinition::new("storage_grid_amperage_input", "Grid charge current", ELECTRICAL_CURRENT_AMPERE, "chgCurr").round(2),
    SensorDefinition::new("storage_grid_out_current", "Grid out current", ELECTRICAL_CURRENT_AMPERE, "outPutCurrent").round(2),
    SensorDefinition::new("storage_battery_voltage", "Battery voltage", VOLT, "vBat").round(2),
    SensorDefinition::new("storage_load_percentage", "Load percentage", PERCENTAGE, "loadPercent").class(Battery).round(2),
];

/* Mix reports its powers in kW */
#[rustfmt::skip]
const MIX: &[SensorDefinition] = &[
    SensorDefinition::new("inverter_voltage_input_1", "Input 1 voltage", VOLT, "vPv1"),
    SensorDefinition::new("inverter_voltage_input_2", "Input 2 voltage", VOLT, "vPv2"),
    SensorDefinition::new("battery_voltage", "Battery voltage", VOLT, "vBat"),
    SensorDefinition::new("inverter_wattage_input_1", "Input 1 Wattage", POWER_WATT, "pPv1").class(Power),
    SensorDefinition::new("inverter_wattage_input_2", "Input 2 Wattage", POWER_WATT, "pPv2").class(Power),
    SensorDefinition::new("inverter_total_wattage", "Total Input Wattage", POWER_KILO_WATT, "ppv").class(Power),
    SensorDefinition::new("current_load", "Current Load", POWER_KILO_WATT, "pLocalLoad").class(Power),
    SensorDefinition::new("battery_discharge", "Battery Discharge", POWER_KILO_WATT, "pdisCharge1").class(Power),
    SensorDefinition::new("export_to_grid", "Export to Grid", POWER_KILO_WATT, "pactogrid").class(Power),
    SensorDefinition::new("battery_charge", "Battery Charge", POWER_KILO_WATT, "chargePower").class(Power),
    SensorDefinition::new("battery_percent", "Battery SOC", PERCENTAGE, "SOC").class(Battery),
];

#[rustfmt::skip]
const TLX: &[SensorDefinition] = &[
    SensorDefinition::new("inverter_energy_today", "Energy today", ENERGY_KILO_WATT_HOUR, "eacToday").round(1),
    SensorDefinition::new("inverter_energy_total", "Lifetime energy output", ENERGY_KILO_WATT_HOUR, "eacTotal").round(1),
    SensorDefinition::new("inverter_voltage_input_1", "Input 1 voltage", VOLT, "vpv1").round(2),
    SensorDefinition::new("inverter_amperage_input_1", "Input 1 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv1").round(1),
    SensorDefinition::new("inverter_wattage_input_1", "Input 1 Wattage", POWER_WATT, "ppv1").class(Power).round(1),
    SensorDefinition::new("inverter_voltage_input_2", "Input 2 voltage", VOLT, "vpv2").round(1),
    SensorDefinition::new("inverter_amperage_input_2", "Input 2 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv2").round(1),
    SensorDefinition::new("inverter_wattage_input_2", "Input 2 Wattage", POWER_WATT, "ppv2").class(Power).round(1),
    SensorDefinition::new("inverter_voltage_input_3", "Input 3 voltage", VOLT, "vpv3").round(1),
    SensorDefinition::new("inverter_amperage_input_3", "Input 3 Amperage", ELECTRICAL_CURRENT_AMPERE, "ipv3").round(1),
    SensorDefinition::new("inverter_wattage_input_3", "Input 3 Wattage", POWER_WATT, "ppv3").class(Power).round(1),
    SensorDefinition::new("inverter_internal_wattage", "Internal wattage", POWER_WATT, "ppv").class(Power).round(1),
    SensorDefinition::new("inverter_reactive_voltage", "Reactive voltage", VOLT, "vacr").round(1),
    SensorDefinition::new("inverter_inverter_reactive_amperage", "Reactive amperage", ELECTRICAL_CURRENT_AMPERE, "iacr").round(1),
    SensorDefinition::new("inverter_frequency", "AC frequency", FREQUENCY_HERTZ, "fac").round(1),
    SensorDefinition::new("inverter_current_wattage", "Output power", POWER_WATT, "pac").class(Power).round(1),
    SensorDefinition::new("inverter_current_reactive_wattage", "Reactive wattage", POWER_WATT, "pacr").class(Power).round(1),
    SensorDefinition::new("temperature_1", "Temperature 1", TEMP_CELSIUS, "temp1").class(Temperature).round(1),
    SensorDefinition::new("temperature_2", "Temperature 2", TEMP_CELSIUS, "temp2").class(Temperature).round(1),
    SensorDefinition::new("temperature_3", "Temperature 3", TEMP_CELSIUS, "temp3").class(Temperature).round(1),
    SensorDefinition::new("temperature_4", "Temperature 4", TEMP_CELSIUS, "temp4").class(Temperature).round(1),
    SensorDefinition::new("temperature_5", "Temperature 5", TEMP_CELSIUS, "temp5").class(Temperature).round(1),
];
