use std::{
    net::{SocketAddr, UdpSocket},
    str::FromStr,
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::color::Color;
use crate::strip::{encode, ChannelOrder, LedStrip};

const UNIVERSE_SIZE: usize = 512;
// Whole pixels only, a pixel never straddles two universes
const PIXELS_PER_UNIVERSE: usize = UNIVERSE_SIZE / 3;

/// Last universe a strip of `pixel_count` starting at `first_universe` needs,
/// or `None` if the numbering would run past `u32::MAX`.
pub fn last_universe(first_universe: u32, pixel_count: usize) -> Option<u32> {
    let extra = pixel_count.div_ceil(PIXELS_PER_UNIVERSE).saturating_sub(1);
    u32::try_from(extra)
        .ok()
        .and_then(|extra| first_universe.checked_add(extra))
}

/// Drives the strip through OLA's OSC input, one DMX universe per
/// 170 pixels starting at `first_universe`.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    first_universe: u32,
    brightness: f32,
    order: ChannelOrder,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(
        target_addr: SocketAddr,
        first_universe: u32,
        pixel_count: usize,
        brightness: f32,
        order: ChannelOrder,
    ) -> Result<Self, String> {
        let our_addr = SocketAddr::from_str("0.0.0.0:0").map_err(|err| err.to_string())?;
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        Ok(OlaOutput {
            sock,
            target_addr,
            first_universe,
            brightness: brightness.clamp(0.0, 1.0),
            order,
            buffer: vec![0; pixel_count * 3],
        })
    }

    fn universe_packets(&self) -> Result<Vec<Vec<u8>>, String> {
        self.buffer
            .chunks(PIXELS_PER_UNIVERSE * 3)
            .enumerate()
            .map(|(i, channels)| {
                let universe = u32::try_from(i)
                    .ok()
                    .and_then(|i| self.first_universe.checked_add(i))
                    .ok_or_else(|| {
                        format!("Universe {} + {} is out of range", self.first_universe, i)
                    })?;
                encoder::encode(&OscPacket::Message(OscMessage {
                    addr: format!("/dmx/universe/{}", universe),
                    args: vec![OscType::Blob(channels.to_vec())],
                }))
                .map_err(|err| format!("Cannot encode universe {}: {:?}", universe, err))
            })
            .collect()
    }

    pub fn blackout(&mut self) -> Result<(), String> {
        self.buffer.fill(0);
        self.flush()
    }
}

impl LedStrip for OlaOutput {
    fn len(&self) -> usize {
        self.buffer.len() / 3
    }

    fn set_pixel(&mut self, index: usize, color: Color) {
        let start = index * 3;
        self.buffer[start..start + 3].copy_from_slice(&encode(color, self.brightness, self.order));
    }

    fn flush(&mut self) -> Result<(), String> {
        for msg_buf in self.universe_packets()? {
            if let Err(err) = self.sock.send_to(&msg_buf, self.target_addr) {
                return Err(format!("Cannot send to OLA at {}: {}", self.target_addr, err));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;
    use std::time::Duration;

    fn receiver() -> UdpSocket {
        let sock = UdpSocket::bind("127.0.0.1:0").unwrap();
        sock.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        sock
    }

    fn recv_message(sock: &UdpSocket) -> OscMessage {
        let mut buf = [0u8; decoder::MTU];
        let size = sock.recv(&mut buf).unwrap();
        match decoder::decode(&buf[..size]).unwrap() {
            OscPacket::Message(msg) => msg,
            OscPacket::Bundle(bundle) => panic!("Unexpected bundle {:?}", bundle),
        }
    }

    #[test]
    fn splits_strip_across_universes() {
        let sock = receiver();
        let target = sock.local_addr().unwrap();
        let mut ola = OlaOutput::new(target, 1, 300, 1.0, ChannelOrder::Grb).unwrap();
        assert_eq!(ola.len(), 300);

        ola.set_pixel(0, Color::new(10, 20, 30));
        ola.set_pixel(170, Color::new(40, 50, 60));
        ola.flush().unwrap();

        let first = recv_message(&sock);
        assert_eq!(first.addr, "/dmx/universe/1");
        match &first.args[0] {
            OscType::Blob(channels) => {
                assert_eq!(channels.len(), 510);
                assert_eq!(&channels[..3], &[20, 10, 30]);
            }
            other => panic!("Unexpected argument {:?}", other),
        }

        let second = recv_message(&sock);
        assert_eq!(second.addr, "/dmx/universe/2");
        match &second.args[0] {
            OscType::Blob(channels) => {
                assert_eq!(channels.len(), 390);
                assert_eq!(&channels[..3], &[50, 40, 60]);
            }
            other => panic!("Unexpected argument {:?}", other),
        }
    }

    #[test]
    fn universe_numbering_must_fit() {
        let sock = receiver();
        let target = sock.local_addr().unwrap();

        let mut overflowing = OlaOutput::new(target, u32::MAX, 300, 1.0, ChannelOrder::Rgb).unwrap();
        assert!(overflowing.flush().is_err());

        let mut single = OlaOutput::new(target, u32::MAX, 170, 1.0, ChannelOrder::Rgb).unwrap();
        single.flush().unwrap();
        assert_eq!(recv_message(&sock).addr, format!("/dmx/universe/{}", u32::MAX));
    }

    #[test]
    fn last_universe_counts_whole_universes() {
        assert_eq!(last_universe(0, 170), Some(0));
        assert_eq!(last_universe(0, 171), Some(1));
        assert_eq!(last_universe(4, 300), Some(5));
        assert_eq!(last_universe(u32::MAX, 170), Some(u32::MAX));
        assert_eq!(last_universe(u32::MAX, 300), None);
    }

    #[test]
    fn brightness_applies_to_writes() {
        let sock = receiver();
        let mut ola =
            OlaOutput::new(sock.local_addr().unwrap(), 0, 2, 0.5, ChannelOrder::Rgb).unwrap();
        ola.set_pixel(1, Color::new(200, 100, 0));
        ola.flush().unwrap();

        match &recv_message(&sock).args[0] {
            OscType::Blob(channels) => assert_eq!(channels, &vec![0, 0, 0, 100, 50, 0]),
            other => panic!("Unexpected argument {:?}", other),
        }
    }
}
