//! Caller-facing lamp commands.
//!
//! One method per CLI command. Each builds the advertising blob through
//! `lumen-proto` and hands it to the radio exactly once; any failure
//! propagates and nothing is broadcast.

use crate::hci::Radio;

#[derive(Debug, thiserror::Error)]
pub enum LampError {
    #[error(transparent)]
    Level(#[from] lumen_proto::LevelError),
    #[error(transparent)]
    Adv(#[from] lumen_proto::adv::AdvError),
    #[error("radio error: {0}")]
    Radio(#[from] std::io::Error),
}

pub struct Lamp<R: Radio> {
    name: String,
    radio: R,
}

impl<R: Radio> Lamp<R> {
    pub fn new(name: impl Into<String>, radio: R) -> Self {
        Self {
            name: name.into(),
            radio,
        }
    }

    /// Pair with the lamp. The lamp identifier is repeated in the argument
    /// bytes so the lamp can learn which name addresses it.
    pub fn setup(&mut self) -> Result<(), LampError> {
        let id = lumen_proto::crc::lamp_id(&self.name);
        self.send(lumen_proto::commands::SETUP, id[0], id[1])?;
        log::info!("pairing with lamp {}", self.name);
        Ok(())
    }

    pub fn on(&mut self) -> Result<(), LampError> {
        self.send(lumen_proto::commands::ON, 0, 0)?;
        log::info!("turning lamp {} on", self.name);
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), LampError> {
        self.send(lumen_proto::commands::OFF, 0, 0)?;
        log::info!("turning lamp {} off", self.name);
        Ok(())
    }

    /// Set the cold channel to `level` (1..=10), warm channel off.
    pub fn cold(&mut self, level: u8) -> Result<(), LampError> {
        let byte = lumen_proto::level_byte(level)?;
        self.send(lumen_proto::commands::BRIGHTNESS, byte, 0)?;
        log::info!("lamp {}: cold brightness {}", self.name, level);
        Ok(())
    }

    /// Set the warm channel to `level` (1..=10), cold channel off.
    pub fn warm(&mut self, level: u8) -> Result<(), LampError> {
        let byte = lumen_proto::level_byte(level)?;
        self.send(lumen_proto::commands::BRIGHTNESS, 0, byte)?;
        log::info!("lamp {}: warm brightness {}", self.name, level);
        Ok(())
    }

    /// Set both channels to `level` (1..=10).
    pub fn dual(&mut self, level: u8) -> Result<(), LampError> {
        let byte = lumen_proto::level_byte(level)?;
        self.send(lumen_proto::commands::BRIGHTNESS, byte, byte)?;
        log::info!("lamp {}: dual brightness {}", self.name, level);
        Ok(())
    }

    fn send(&mut self, command: u8, arg0: u8, arg1: u8) -> Result<(), LampError> {
        let blob = lumen_proto::encode(&self.name, command, arg0, arg1)?;
        log::debug!("advertising data: {:02X?}", blob);
        self.radio.broadcast(&blob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every blob handed to it.
    #[derive(Default)]
    struct MockRadio {
        broadcasts: Vec<Vec<u8>>,
    }

    impl Radio for &mut MockRadio {
        fn broadcast(&mut self, data: &[u8]) -> std::io::Result<()> {
            self.broadcasts.push(data.to_vec());
            Ok(())
        }
    }

    fn whitened_frame(blob: &[u8]) -> Vec<u8> {
        // Strip the flags structure and the UUID-list header.
        assert_eq!(&blob[..5], &[0x02, 0x01, 0x01, 0x1A, 0x03]);
        blob[5..].to_vec()
    }

    fn raw_frame(blob: &[u8]) -> Vec<u8> {
        lumen_proto::whitening::reverse_bits(&lumen_proto::whitening::whiten(&whitened_frame(
            blob,
        )))
    }

    #[test]
    fn on_broadcasts_once() {
        let mut radio = MockRadio::default();
        let mut lamp = Lamp::new("Lamp1", &mut radio);
        lamp.on().unwrap();
        assert_eq!(radio.broadcasts.len(), 1);
        assert_eq!(radio.broadcasts[0].len(), 30);

        let frame = raw_frame(&radio.broadcasts[0]);
        assert_eq!(frame[11], lumen_proto::commands::ON);
        assert_eq!(&frame[12..14], &lumen_proto::crc::lamp_id("Lamp1"));
        assert_eq!(&frame[14..16], &[0, 0]);
    }

    #[test]
    fn setup_repeats_lamp_id_in_args() {
        let mut radio = MockRadio::default();
        let mut lamp = Lamp::new("Lamp1", &mut radio);
        lamp.setup().unwrap();

        let frame = raw_frame(&radio.broadcasts[0]);
        assert_eq!(frame[11], lumen_proto::commands::SETUP);
        assert_eq!(&frame[14..16], &lumen_proto::crc::lamp_id("Lamp1"));
    }

    #[test]
    fn brightness_channel_args() {
        let mut radio = MockRadio::default();
        {
            let mut lamp = Lamp::new("Lamp1", &mut radio);
            lamp.cold(5).unwrap();
            lamp.warm(1).unwrap();
            lamp.dual(10).unwrap();
        }

        let cold = raw_frame(&radio.broadcasts[0]);
        assert_eq!(&cold[14..16], &[0x7F, 0x00]);

        let warm = raw_frame(&radio.broadcasts[1]);
        assert_eq!(&warm[14..16], &[0x00, 0x1A]);

        let dual = raw_frame(&radio.broadcasts[2]);
        assert_eq!(&dual[14..16], &[0xFF, 0xFF]);
    }

    #[test]
    fn invalid_level_broadcasts_nothing() {
        let mut radio = MockRadio::default();
        {
            let mut lamp = Lamp::new("Lamp1", &mut radio);
            assert!(matches!(lamp.cold(0), Err(LampError::Level(_))));
            assert!(matches!(lamp.dual(11), Err(LampError::Level(_))));
        }
        assert!(radio.broadcasts.is_empty());
    }

    #[test]
    fn radio_failure_propagates() {
        struct DeadRadio;
        impl Radio for DeadRadio {
            fn broadcast(&mut self, _data: &[u8]) -> std::io::Result<()> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "no adapter",
                ))
            }
        }

        let mut lamp = Lamp::new("Lamp1", DeadRadio);
        assert!(matches!(lamp.off(), Err(LampError::Radio(_))));
    }
}
