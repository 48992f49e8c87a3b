//! QMI8658 register map
//!
//! Only the registers the tilt controller touches are listed. All multi-byte
//! output registers are laid out low byte first, and the driver configures the
//! serial interface for little-endian, auto-incrementing burst reads. A device
//! left in big-endian mode still returns twelve bytes per burst, but every
//! decoded axis is byte-swapped garbage.

/// Default 7-bit bus address (SA0 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x6B;

/// Value of `WHO_AM_I` on a genuine QMI8658
pub const WHO_AM_I_VALUE: u8 = 0x05;

/// Value written to `Reset` to trigger a soft reset
pub const SOFT_RESET: u8 = 0xB0;

/// Bytes in one accel + gyro burst (6 axes × i16)
pub const SAMPLE_BLOCK_LEN: usize = 12;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Device identifier (0x00)
    WhoAmI = 0x00,

    /// Serial interface configuration (0x02)
    /// Bit 6 enables address auto-increment, bit 5 selects big-endian output
    Ctrl1 = 0x02,

    /// Accelerometer full scale and output data rate (0x03)
    Ctrl2 = 0x03,

    /// Gyroscope full scale and output data rate (0x04)
    Ctrl3 = 0x04,

    /// Low-pass filter enables (0x06)
    Ctrl5 = 0x06,

    /// Sensor enable (0x08)
    Ctrl7 = 0x08,

    /// Temperature, low byte (0x33). High byte follows at 0x34.
    TempL = 0x33,

    /// Accelerometer X, low byte (0x35). Start of the 12-byte sample block:
    /// AX AY AZ GX GY GZ, each little-endian i16.
    AxL = 0x35,

    /// Soft reset (0x60)
    Reset = 0x60,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// `Ctrl1` bit: auto-increment register address during bursts
pub const CTRL1_ADDR_AI: u8 = 1 << 6;
/// `Ctrl1` bit: big-endian output
pub const CTRL1_BE: u8 = 1 << 5;

/// `Ctrl5` bits: gyro LPF enable (bit 4) and accel LPF enable (bit 0)
pub const CTRL5_LPF_ENABLE: u8 = (1 << 4) | (1 << 0);

/// `Ctrl7` bits: gyro enable (bit 1) and accel enable (bit 0)
pub const CTRL7_ACCEL_GYRO_ENABLE: u8 = (1 << 1) | (1 << 0);
