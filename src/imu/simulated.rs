//! Register-level QMI8658 model
//!
//! Implements `embedded_hal::i2c::I2c` so the real driver can run on a host
//! without hardware. Supports scripted transaction failures, NACKs on
//! individual registers, and the power-on big-endian interface mode.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use super::registers::*;
use super::sample::RawSample;

const REGISTER_SPACE: usize = 0x80;
/// Power-on value of `Ctrl1`: big-endian, no auto-increment
const CTRL1_POWER_ON: u8 = CTRL1_BE;

pub struct SimulatedQmi8658 {
    address: u8,
    identity: u8,
    regs: [u8; REGISTER_SPACE],
    pointer: u8,
    sample: RawSample,
    temperature_raw: i16,
    pending_failures: u32,
    nacked_register: Option<u8>,
    sample_reads: u32,
    resets: u32,
}

impl SimulatedQmi8658 {
    pub fn new(address: u8) -> Self {
        let mut sim = Self {
            address,
            identity: WHO_AM_I_VALUE,
            regs: [0; REGISTER_SPACE],
            pointer: 0,
            sample: RawSample::default(),
            temperature_raw: 25 * 256,
            pending_failures: 0,
            nacked_register: None,
            sample_reads: 0,
            resets: 0,
        };
        sim.power_on();
        sim
    }

    fn power_on(&mut self) {
        self.regs = [0; REGISTER_SPACE];
        self.regs[Register::Ctrl1.addr() as usize] = CTRL1_POWER_ON;
    }

    /// Report a different chip id
    pub fn set_identity(&mut self, id: u8) {
        self.identity = id;
    }

    /// Level device resting flat: +1 g on Z at the given counts per g
    pub fn set_level(&mut self, lsb_per_g: i16) {
        self.sample = RawSample::new([0, 0, lsb_per_g], [0, 0, 0]);
    }

    pub fn set_sample(&mut self, sample: RawSample) {
        self.sample = sample;
    }

    pub fn set_temperature_raw(&mut self, raw: i16) {
        self.temperature_raw = raw;
    }

    /// Fail the next `count` transactions with a bus error
    pub fn fail_transactions(&mut self, count: u32) {
        self.pending_failures = count;
    }

    /// NACK every data write to `reg`
    pub fn nack_register(&mut self, reg: Register) {
        self.nacked_register = Some(reg.addr());
    }

    /// Flip the interface byte order behind the driver's back
    pub fn force_big_endian(&mut self, big_endian: bool) {
        let ctrl1 = &mut self.regs[Register::Ctrl1.addr() as usize];
        if big_endian {
            *ctrl1 |= CTRL1_BE;
        } else {
            *ctrl1 &= !CTRL1_BE;
        }
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.regs[reg.addr() as usize]
    }

    /// Completed burst reads of the sample block
    pub fn sample_reads(&self) -> u32 {
        self.sample_reads
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    fn big_endian(&self) -> bool {
        self.regs[Register::Ctrl1.addr() as usize] & CTRL1_BE != 0
    }

    fn auto_increment(&self) -> bool {
        self.regs[Register::Ctrl1.addr() as usize] & CTRL1_ADDR_AI != 0
    }

    fn enabled(&self) -> bool {
        self.regs[Register::Ctrl7.addr() as usize] & CTRL7_ACCEL_GYRO_ENABLE != 0
    }

    /// One byte of a little-endian word pair, honouring the output byte order
    fn word_byte(&self, [lo, hi]: [u8; 2], low: bool) -> u8 {
        if low != self.big_endian() { lo } else { hi }
    }

    fn read_reg(&self, addr: u8) -> u8 {
        let temp_l = Register::TempL.addr();
        let ax_l = Register::AxL.addr();
        match addr {
            a if a == Register::WhoAmI.addr() => self.identity,
            a if a == temp_l || a == temp_l + 1 => {
                self.word_byte(self.temperature_raw.to_le_bytes(), a == temp_l)
            }
            a if (ax_l..ax_l + SAMPLE_BLOCK_LEN as u8).contains(&a) => {
                if !self.enabled() {
                    return 0;
                }
                let offset = (a - ax_l) as usize;
                let block = self.sample.to_le_bytes();
                let word = offset & !1;
                self.word_byte([block[word], block[word + 1]], offset % 2 == 0)
            }
            a => self.regs[a as usize % REGISTER_SPACE],
        }
    }

    fn write_reg(&mut self, addr: u8, value: u8) -> Result<(), ErrorKind> {
        if self.nacked_register == Some(addr) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        if addr == Register::Reset.addr() && value == SOFT_RESET {
            self.power_on();
            self.resets += 1;
            return Ok(());
        }
        self.regs[addr as usize % REGISTER_SPACE] = value;
        Ok(())
    }

    fn advance(&mut self) {
        if self.auto_increment() {
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl ErrorType for SimulatedQmi8658 {
    type Error = ErrorKind;
}

impl I2c for SimulatedQmi8658 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(ErrorKind::Bus);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = reg;
                    for &value in data {
                        self.write_reg(self.pointer, value)?;
                        self.advance();
                    }
                }
                Operation::Read(buf) => {
                    if self.pointer == Register::AxL.addr() && buf.len() == SAMPLE_BLOCK_LEN {
                        self.sample_reads += 1;
                    }
                    for byte in buf.iter_mut() {
                        *byte = self.read_reg(self.pointer);
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
