/// Processing of one uplink envelope: decode, record, forward.
use async_trait::async_trait;
use log::{debug, info, warn};

use crate::decoder::{decode_frame, to_numbered_fields, FrameError};
use crate::envelope::UplinkEnvelope;
use crate::models::{NumberedFieldView, ReadingRecord};
use crate::registry::{DeviceRegistry, ThingSpeakTarget};
use crate::thingspeak::ForwardError;
use crate::utils::format_datetime;

/// Persistence seam for decoded readings.
#[async_trait]
pub trait ReadingStore {
    async fn store_reading(&self, record: &ReadingRecord) -> Result<(), String>;
}

/// Dashboard seam for the numbered-field view.
#[async_trait]
pub trait DashboardSink {
    async fn push(
        &self,
        target: &ThingSpeakTarget,
        view: &NumberedFieldView,
    ) -> Result<(), ForwardError>;
}

/// Handle one uplink end to end.
///
/// Unrecognized frame lengths are logged and dropped rather than failed: the
/// fleet occasionally transmits status frames this service has no layout
/// for. Store and forward errors propagate so the caller can log them per
/// envelope and move on.
pub async fn handle_uplink(
    envelope: &UplinkEnvelope,
    registry: &dyn DeviceRegistry,
    store: &dyn ReadingStore,
    sink: &dyn DashboardSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let device_id = &envelope.end_device_ids.device_id;
    let bytes = envelope.frame_bytes()?;

    let reading = match decode_frame(&bytes, envelope.port()) {
        Ok(reading) => reading,
        Err(FrameError::UnrecognizedLength(len)) => {
            warn!("Dropping unrecognized {}-byte frame from {}", len, device_id);
            return Ok(());
        }
    };

    let record = ReadingRecord {
        device_id: device_id.clone(),
        application_id: envelope
            .end_device_ids
            .application_ids
            .application_id
            .clone(),
        recorded_at: envelope.recorded_at(),
        reading,
    };

    store.store_reading(&record).await?;
    info!(
        "Recorded reading from {} at {}",
        device_id,
        format_datetime(&record.recorded_at)
    );

    match registry.find_device(device_id) {
        Some(device) => {
            if let Some(target) = &device.thingspeak {
                let view = to_numbered_fields(&record.reading);
                sink.push(target, &view).await?;
                info!(
                    "Device {} shown on ThingSpeak channel {}",
                    device_id, target.channel_id
                );
            } else {
                debug!("Device {} has no ThingSpeak channel", device_id);
            }
        }
        None => debug!("Device {} is not registered, skipping forward", device_id),
    }

    Ok(())
}
