//! Raw HCI advertising, the radio side of the codec.
//!
//! Opens an `AF_BLUETOOTH`/`BTPROTO_HCI` raw socket and drives the
//! controller with H4-framed command packets
//! (`[0x01, opcode_lo, opcode_hi, param_len, params...]`). Only the three
//! LE advertising commands are needed: set parameters, set data, enable.
//! Events coming back from the controller are ignored - the protocol is
//! one-way and a lost advertisement is simply a lost command.

use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

const BTPROTO_HCI: libc::c_int = 1;

/// H4 packet type for host-to-controller commands
const HCI_COMMAND_PKT: u8 = 0x01;

/// LE Controller command group
const OGF_LE_CTL: u16 = 0x08;
const OCF_LE_SET_ADV_PARAMETERS: u16 = 0x0006;
const OCF_LE_SET_ADV_DATA: u16 = 0x0008;
const OCF_LE_SET_ADV_ENABLE: u16 = 0x000A;

/// Non-connectable undirected advertising (ADV_NONCONN_IND)
const ADV_NONCONN_IND: u8 = 0x03;

/// Advertising interval, 160 * 0.625 ms = 100 ms
const ADV_INTERVAL: u16 = 0x00A0;

/// How long one advertisement stays on the air before it is stopped.
const DWELL: std::time::Duration = std::time::Duration::from_millis(100);

#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

/// Write-only broadcast sink. One call, one advertisement.
pub trait Radio {
    fn broadcast(&mut self, data: &[u8]) -> io::Result<()>;
}

/// Radio backed by a local HCI device (`hciN`).
pub struct HciRadio {
    fd: OwnedFd,
    dev: u16,
}

impl HciRadio {
    /// Open and bind the raw HCI socket for device index `dev`.
    ///
    /// Needs `CAP_NET_RAW` (or root) on most systems.
    pub fn open(dev: u16) -> io::Result<Self> {
        let fd = unsafe {
            libc::socket(
                libc::AF_BLUETOOTH,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                BTPROTO_HCI,
            )
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        let addr = SockaddrHci {
            hci_family: libc::AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev,
            hci_channel: 0,
        };
        let rc = unsafe {
            libc::bind(
                fd.as_raw_fd(),
                &addr as *const SockaddrHci as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, dev })
    }

    fn send_command(&self, ocf: u16, params: &[u8]) -> io::Result<()> {
        let opcode = (OGF_LE_CTL << 10) | ocf;
        let mut pkt = Vec::with_capacity(4 + params.len());
        pkt.push(HCI_COMMAND_PKT);
        pkt.extend_from_slice(&opcode.to_le_bytes());
        pkt.push(params.len() as u8);
        pkt.extend_from_slice(params);

        let written = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                pkt.as_ptr() as *const libc::c_void,
                pkt.len(),
            )
        };
        if written < 0 {
            return Err(io::Error::last_os_error());
        }
        if written as usize != pkt.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "short write on HCI socket",
            ));
        }
        Ok(())
    }

    fn set_advertising_parameters(&self) -> io::Result<()> {
        let mut params = [0u8; 15];
        params[0..2].copy_from_slice(&ADV_INTERVAL.to_le_bytes()); // min interval
        params[2..4].copy_from_slice(&ADV_INTERVAL.to_le_bytes()); // max interval
        params[4] = ADV_NONCONN_IND;
        // [5] own address type: public, [6..13] peer address: unused
        params[13] = 0x07; // all three advertising channels
        // [14] filter policy: allow all
        self.send_command(OCF_LE_SET_ADV_PARAMETERS, &params)
    }

    fn set_advertising_data(&self, data: &[u8]) -> io::Result<()> {
        if data.len() > 31 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "advertising data exceeds 31 bytes",
            ));
        }
        // Fixed 32-byte parameter block: significant length + padded buffer.
        let mut params = [0u8; 32];
        params[0] = data.len() as u8;
        params[1..1 + data.len()].copy_from_slice(data);
        self.send_command(OCF_LE_SET_ADV_DATA, &params)
    }

    fn set_advertising_enable(&self, enable: bool) -> io::Result<()> {
        self.send_command(OCF_LE_SET_ADV_ENABLE, &[enable as u8])
    }
}

impl Radio for HciRadio {
    fn broadcast(&mut self, data: &[u8]) -> io::Result<()> {
        log::debug!("hci{}: broadcasting {} bytes", self.dev, data.len());
        self.set_advertising_parameters()?;
        self.set_advertising_data(data)?;
        self.set_advertising_enable(true)?;
        std::thread::sleep(DWELL);
        self.set_advertising_enable(false)
    }
}
