/// Mapping from normalized readings to the numbered ThingSpeak fields.
use crate::models::{Location, NumberedFieldView, SensorReading};

/// Render a reading in the legacy numbered-field format.
///
/// The slot assignment is fixed and layout-independent; quantities the
/// reading does not carry map to absent slots. Pure and total, never fails.
pub fn to_numbered_fields(reading: &SensorReading) -> NumberedFieldView {
    let temperature = |location| reading.temperature.get(&location).copied().flatten();

    NumberedFieldView {
        field1: temperature(Location::Outer),
        field2: temperature(Location::Drop),
        field3: temperature(Location::Lower),
        field4: temperature(Location::Middle),
        field5: temperature(Location::Upper),
        field6: temperature(Location::Roof),
        field7: reading.humidity.get(&Location::Roof).copied().flatten(),
        field8: reading.weight,
        status: status_line(reading),
        sensor: reading.clone(),
    }
}

// Absent version or battery renders as an empty placeholder; a frame with a
// dead battery probe must still produce a status line.
fn status_line(reading: &SensorReading) -> String {
    let version = reading.version.map(|v| v.to_string()).unwrap_or_default();
    let battery = reading.battery.map(|v| v.to_string()).unwrap_or_default();
    format!("version {}, {} V", version, battery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::layout::decode_frame;

    #[test]
    fn maps_the_thingspeak_generation_onto_all_slots() {
        let bytes: [u8; 19] = [
            0x00, 0x88, 0x01, 0x25, 0x00, 0x8E, 0x12, 0xAC, 0x08, 0x0E, 0x08, 0x14, 0x08, 0x9E,
            0x07, 0xC9, 0x07, 0x91, 0x07,
        ];
        let view = to_numbered_fields(&decode_frame(&bytes, 1).unwrap());

        assert_eq!(view.field1, Some(20.62)); // outer temperature
        assert_eq!(view.field2, Some(20.68)); // drop temperature
        assert_eq!(view.field3, Some(19.5)); // lower temperature
        assert_eq!(view.field4, Some(19.93)); // middle temperature
        assert_eq!(view.field5, Some(19.37)); // upper temperature
        assert_eq!(view.field6, Some(22.2)); // roof temperature
        assert_eq!(view.field7, Some(47.5)); // roof humidity
        assert_eq!(view.field8, Some(0.37)); // weight
        assert_eq!(view.status, "version 0, 3.92 V");
    }

    #[test]
    fn suppressed_probes_map_to_absent_slots() {
        let bytes: [u8; 19] = [
            0x00, 0x7E, 0x01, 0xAB, 0x00, 0x00, 0x80, 0x00, 0x80, 0x00, 0x80, 0x00, 0x80, 0x00,
            0x80, 0x00, 0x80, 0x00, 0x80,
        ];
        let view = to_numbered_fields(&decode_frame(&bytes, 1).unwrap());

        for (slot, value) in [
            ("field1", view.field1),
            ("field2", view.field2),
            ("field3", view.field3),
            ("field4", view.field4),
            ("field5", view.field5),
            ("field6", view.field6),
            ("field7", view.field7),
        ] {
            assert_eq!(value, None, "{}", slot);
        }
        assert_eq!(view.field8, Some(1.71));
        assert_eq!(view.status, "version 0, 3.82 V");
    }

    #[test]
    fn hive_id_generations_only_fill_the_weight_slot() {
        // German location names have no numbered slot; only the shared
        // weight quantity maps through.
        let bytes: [u8; 20] = [
            0x01, 0x2A, 0x12, 0xFD, 0x12, 0x07, 0x80, 0x07, 0xED, 0x07, 0xDD, 0x09, 0x8F, 0x19,
            0x4E, 0x25, 0x0E, 0x06, 0x4B, 0x01,
        ];
        let view = to_numbered_fields(&decode_frame(&bytes, 1).unwrap());

        assert_eq!(view.field1, None);
        assert_eq!(view.field6, None);
        assert_eq!(view.field7, None);
        assert_eq!(view.field8, Some(15.5));
        assert_eq!(view.status, "version 1, 3.31 V");
        assert_eq!(view.sensor.hive_id, Some(42));
    }

    #[test]
    fn absent_version_and_battery_render_as_empty_placeholders() {
        let reading = SensorReading::default();
        assert_eq!(status_line(&reading), "version ,  V");
    }

    #[test]
    fn mapping_is_idempotent() {
        let bytes: [u8; 19] = [
            0x00, 0x88, 0x01, 0x25, 0x00, 0x8E, 0x12, 0xAC, 0x08, 0x0E, 0x08, 0x14, 0x08, 0x9E,
            0x07, 0xC9, 0x07, 0x91, 0x07,
        ];
        let reading = decode_frame(&bytes, 1).unwrap();
        assert_eq!(to_numbered_fields(&reading), to_numbered_fields(&reading));
    }
}
