//! The label dispatch table for readout field lines.
//!
//! Every `LABEL: value` line inside a readout block routes through this
//! table. Each entry names the record field to set (by its persisted name,
//! used in warnings) and the coercion to apply. Adding or removing a
//! protocol field is a data change here, not a control-flow change in the
//! parser.

use batlog_core::record::BatteryRecord;

/// How a field line's value lands in the record.
pub(crate) enum Slot {
    /// Verbatim string copy.
    Text(fn(&mut BatteryRecord) -> &mut String),
    /// Unit-stripped integer coercion.
    Count(fn(&mut BatteryRecord) -> &mut i32),
    /// The dual-unit temperature pair.
    Temperature,
}

/// One dispatch entry: wire label, persisted field name, coercion slot.
pub(crate) struct FieldSpec {
    pub label: &'static str,
    pub field: &'static str,
    pub slot: Slot,
}

/// The fixed dispatch table, in the order the adapter emits fields.
pub(crate) const FIELD_TABLE: &[FieldSpec] = &[
    FieldSpec {
        label: "MANUFACTURER",
        field: "manufacturer",
        slot: Slot::Text(|r| &mut r.manufacturer),
    },
    FieldSpec {
        label: "BATTERY NAME",
        field: "name",
        slot: Slot::Text(|r| &mut r.name),
    },
    FieldSpec {
        label: "CHEMISTRY",
        field: "chemistry",
        slot: Slot::Text(|r| &mut r.chemistry),
    },
    FieldSpec {
        label: "SPECIFICATION",
        field: "specification",
        slot: Slot::Text(|r| &mut r.specification),
    },
    FieldSpec {
        label: "SERIAL NUMBER",
        field: "serial",
        slot: Slot::Text(|r| &mut r.serial_number),
    },
    FieldSpec {
        label: "MANUFACT. DATE",
        field: "mfgdate",
        slot: Slot::Text(|r| &mut r.mfg_date),
    },
    FieldSpec {
        label: "VOLTAGE",
        field: "voltage",
        slot: Slot::Count(|r| &mut r.voltage),
    },
    FieldSpec {
        label: "VOLTAGE MEASURED",
        field: "voltagemeasured",
        slot: Slot::Count(|r| &mut r.voltage_measured),
    },
    FieldSpec {
        label: "CURRENT",
        field: "current",
        slot: Slot::Count(|r| &mut r.current),
    },
    FieldSpec {
        label: "TEMPERATURE",
        field: "temperature",
        slot: Slot::Temperature,
    },
    FieldSpec {
        label: "NTC MEASURED",
        field: "ntc",
        slot: Slot::Count(|r| &mut r.ntc),
    },
    FieldSpec {
        label: "RELATIVE CHARGE",
        field: "relativecharge",
        slot: Slot::Count(|r| &mut r.relative_charge),
    },
    FieldSpec {
        label: "ABSOLUTE CHARGE",
        field: "absolutecharge",
        slot: Slot::Count(|r| &mut r.absolute_charge),
    },
    FieldSpec {
        label: "DESIGN CAPACITY",
        field: "designcapacity",
        slot: Slot::Count(|r| &mut r.design_capacity),
    },
    FieldSpec {
        label: "DESIGN VOLTAGE",
        field: "designvoltage",
        slot: Slot::Count(|r| &mut r.design_voltage),
    },
    FieldSpec {
        label: "REMAIN. CAPACITY",
        field: "remainingcapacity",
        slot: Slot::Count(|r| &mut r.remaining_capacity),
    },
    FieldSpec {
        label: "FULL CAPACITY",
        field: "fullcapacity",
        slot: Slot::Count(|r| &mut r.full_capacity),
    },
    FieldSpec {
        label: "CHARGING VOLTAGE",
        field: "chargingvoltage",
        slot: Slot::Count(|r| &mut r.charging_voltage),
    },
    FieldSpec {
        label: "CHARGING CURRENT",
        field: "chargingcurrent",
        slot: Slot::Count(|r| &mut r.charging_current),
    },
    FieldSpec {
        label: "TIME TO EMPTY",
        field: "timetoempty",
        slot: Slot::Count(|r| &mut r.time_to_empty),
    },
    FieldSpec {
        label: "TIME TO FULL",
        field: "timetofull",
        slot: Slot::Count(|r| &mut r.time_to_full),
    },
    FieldSpec {
        label: "CAPACITY ALARM",
        field: "capacityalarm",
        slot: Slot::Count(|r| &mut r.capacity_alarm),
    },
    FieldSpec {
        label: "TIME ALARM",
        field: "timealarm",
        slot: Slot::Count(|r| &mut r.time_alarm),
    },
    FieldSpec {
        label: "CYCLE COUNT",
        field: "cyclecount",
        slot: Slot::Count(|r| &mut r.cycle_count),
    },
    FieldSpec {
        label: "MAX ERROR",
        field: "maxerror",
        slot: Slot::Count(|r| &mut r.max_error),
    },
    FieldSpec {
        label: "STATE REGISTER",
        field: "stateregister",
        slot: Slot::Text(|r| &mut r.state_register),
    },
    FieldSpec {
        label: "MODE REGISTER",
        field: "moderegister",
        slot: Slot::Text(|r| &mut r.mode_register),
    },
    FieldSpec {
        label: "OptMfg 0x2f",
        field: "optmfg2f",
        slot: Slot::Text(|r| &mut r.opt_mfg_2f),
    },
    FieldSpec {
        label: "OptMfg 0x3c",
        field: "optmfg3c",
        slot: Slot::Text(|r| &mut r.opt_mfg_3c),
    },
    FieldSpec {
        label: "OptMfg 0x3d",
        field: "optmfg3d",
        slot: Slot::Text(|r| &mut r.opt_mfg_3d),
    },
    FieldSpec {
        label: "OptMfg 0x3e",
        field: "optmfg3e",
        slot: Slot::Text(|r| &mut r.opt_mfg_3e),
    },
    FieldSpec {
        label: "OptMfg 0x3f",
        field: "optmfg3f",
        slot: Slot::Text(|r| &mut r.opt_mfg_3f),
    },
    FieldSpec {
        label: "BATTERY USES PEC",
        field: "batteryusespec",
        slot: Slot::Text(|r| &mut r.battery_uses_pec),
    },
];

/// Look up the dispatch entry for a trimmed label.
pub(crate) fn lookup(label: &str) -> Option<&'static FieldSpec> {
    FIELD_TABLE.iter().find(|spec| spec.label == label)
}
