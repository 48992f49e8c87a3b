//! QMI8658 bus driver
//!
//! Register-level access over any `embedded_hal::i2c::I2c` bus. The driver
//! owns the bus handle until [`Qmi8658::release`] hands it back.

use embedded_hal::{delay::DelayNs, i2c::I2c};

use super::config::SensorConfig;
use super::error::ImuError;
use super::registers::*;
use super::sample::RawSample;

/// Time for the part to come back after a soft reset
const RESET_SETTLE_MS: u32 = 20;

pub struct Qmi8658<I> {
    i2c: I,
    address: u8,
    config: SensorConfig,
}

impl<I> Qmi8658<I>
where
    I: I2c,
{
    /// Wrap a bus. No traffic happens until [`Qmi8658::initialize`].
    pub fn new(i2c: I, address: u8, config: SensorConfig) -> Self {
        Self {
            i2c,
            address,
            config,
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Direct access to the bus (the simulated part uses this to change tilt)
    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, ImuError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg.addr()], &mut buf)
            .map_err(ImuError::bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), ImuError> {
        self.i2c
            .write(self.address, &[reg.addr(), value])
            .map_err(|e| {
                let kind = embedded_hal::i2c::Error::kind(&e);
                ImuError::ConfigWrite {
                    register: reg.addr(),
                    kind,
                }
            })
    }

    pub fn who_am_i(&mut self) -> Result<u8, ImuError> {
        self.read_register(Register::WhoAmI)
    }

    /// Probe the identity register, then write the full configuration.
    ///
    /// Any failed probe is reported as [`ImuError::DeviceNotFound`]; a part
    /// that does not answer on the bus is indistinguishable from one that is
    /// not fitted.
    pub fn initialize(&mut self, delay: &mut impl DelayNs) -> Result<(), ImuError> {
        let found = match self.who_am_i() {
            Ok(id) => id,
            Err(e) => {
                log::debug!("WHO_AM_I read failed: {}", e);
                0x00
            }
        };
        if found != WHO_AM_I_VALUE {
            return Err(ImuError::DeviceNotFound { found });
        }
        log::info!("QMI8658 found at 0x{:02X}", self.address);

        self.write_register(Register::Reset, SOFT_RESET)?;
        delay.delay_ms(RESET_SETTLE_MS);

        let sequence = [
            (Register::Ctrl1, CTRL1_ADDR_AI),
            (Register::Ctrl2, self.config.ctrl2()),
            (Register::Ctrl3, self.config.ctrl3()),
            (Register::Ctrl5, CTRL5_LPF_ENABLE),
            (Register::Ctrl7, CTRL7_ACCEL_GYRO_ENABLE),
        ];
        for (reg, value) in sequence {
            self.write_register(reg, value)?;
        }

        log::info!(
            "QMI8658 configured: {:?} accel, {:?} gyro, {:?}",
            self.config.accel_range,
            self.config.gyro_range,
            self.config.odr
        );
        Ok(())
    }

    /// One burst read of the accel + gyro block
    pub fn read_raw(&mut self) -> Result<RawSample, ImuError> {
        let mut buf = [0u8; SAMPLE_BLOCK_LEN];
        self.i2c
            .write_read(self.address, &[Register::AxL.addr()], &mut buf)
            .map_err(ImuError::bus)?;
        Ok(RawSample::from_le_bytes(&buf))
    }

    /// Die temperature in °C
    pub fn read_temperature(&mut self) -> Result<f32, ImuError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[Register::TempL.addr()], &mut buf)
            .map_err(ImuError::bus)?;
        Ok(i16::from_le_bytes(buf) as f32 / 256.0)
    }
}
