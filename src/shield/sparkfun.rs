//! SparkFun weather shield driver (MPL3115A2 + HTU21D) for Raspberry Pi.
//!
//! Feature-gated behind `hardware` so the crate cross-compiles and runs on
//! non-Pi systems with the simulated shield instead.

use crate::error::{Result, StationError};
use crate::shield::{Measurements, WeatherShield};
use async_trait::async_trait;
use rppal::gpio::{Gpio, OutputPin};
use rppal::i2c::I2c;
use std::time::Duration;
use tokio::sync::Mutex;

const MPL3115A2_ADDR: u16 = 0x60;
const HTU21D_ADDR: u16 = 0x40;

// MPL3115A2 registers
const MPL_STATUS: u8 = 0x00;
const MPL_OUT_P_MSB: u8 = 0x01;
const MPL_PT_DATA_CFG: u8 = 0x13;
const MPL_CTRL_REG1: u8 = 0x26;

// CTRL_REG1 bits: ALT selects altimeter mode, OST starts a one-shot
// conversion, 0x38 is 128x oversampling.
const MPL_ALT: u8 = 0x80;
const MPL_OST: u8 = 0x02;
const MPL_OS128: u8 = 0x38;

// HTU21D no-hold measurement commands
const HTU_MEASURE_TEMP: u8 = 0xF3;
const HTU_MEASURE_HUMIDITY: u8 = 0xF5;

/// BCM pin of the shield's blue status LED, used as the activity indicator.
const STATUS_LED_PIN: u8 = 6;

/// Driver for the SparkFun weather shield on the Pi's I2C1 bus.
pub struct SparkfunShield {
    bus: Mutex<I2c>,
    status_led: Mutex<OutputPin>,
}

impl SparkfunShield {
    /// Open the I2C bus and claim the status LED pin.
    pub fn new() -> Result<Self> {
        let bus = I2c::new()
            .map_err(|e| StationError::sensor_error(format!("failed to open I2C bus: {}", e)))?;
        let gpio = Gpio::new()
            .map_err(|e| StationError::sensor_error(format!("failed to open GPIO: {}", e)))?;
        let status_led = gpio
            .get(STATUS_LED_PIN)
            .map_err(|e| {
                StationError::sensor_error(format!("failed to claim status LED pin: {}", e))
            })?
            .into_output();

        Ok(Self {
            bus: Mutex::new(bus),
            status_led: Mutex::new(status_led),
        })
    }

    /// Run one MPL3115A2 one-shot conversion and return the raw 20-bit
    /// OUT_P value. `altimeter` selects altitude (Q16.4 m) vs barometer
    /// (Q18.2 Pa) output.
    async fn mpl_one_shot(&self, altimeter: bool) -> Result<[u8; 3]> {
        let mode = if altimeter { MPL_ALT } else { 0 };

        {
            let mut bus = self.bus.lock().await;
            bus.set_slave_address(MPL3115A2_ADDR).map_err(i2c_err)?;
            bus.write(&[MPL_CTRL_REG1, mode | MPL_OS128 | MPL_OST])
                .map_err(i2c_err)?;
        }

        // 128x oversampling takes up to ~512 ms; poll PTDR until done.
        for _ in 0..80 {
            tokio::time::sleep(Duration::from_millis(10)).await;

            let mut status = [0u8; 1];
            let mut bus = self.bus.lock().await;
            bus.set_slave_address(MPL3115A2_ADDR).map_err(i2c_err)?;
            bus.write_read(&[MPL_STATUS], &mut status).map_err(i2c_err)?;

            if status[0] & 0x08 != 0 {
                let mut out = [0u8; 3];
                bus.write_read(&[MPL_OUT_P_MSB], &mut out).map_err(i2c_err)?;
                return Ok(out);
            }
        }

        Err(StationError::sensor_error(
            "MPL3115A2 conversion did not complete",
        ))
    }

    /// Trigger one HTU21D measurement and return the 16-bit raw value with
    /// the status bits masked off.
    async fn htu_measure(&self, command: u8) -> Result<u16> {
        {
            let mut bus = self.bus.lock().await;
            bus.set_slave_address(HTU21D_ADDR).map_err(i2c_err)?;
            bus.write(&[command]).map_err(i2c_err)?;
        }

        // Worst-case conversion time at 14-bit resolution is 50 ms.
        tokio::time::sleep(Duration::from_millis(60)).await;

        let mut out = [0u8; 3];
        let mut bus = self.bus.lock().await;
        bus.set_slave_address(HTU21D_ADDR).map_err(i2c_err)?;
        bus.read(&mut out).map_err(i2c_err)?;

        Ok(u16::from_be_bytes([out[0], out[1]]) & 0xFFFC)
    }
}

#[async_trait]
impl WeatherShield for SparkfunShield {
    async fn initialize(&self) -> Result<()> {
        let mut bus = self.bus.lock().await;
        bus.set_slave_address(MPL3115A2_ADDR).map_err(i2c_err)?;
        // Enable data-ready event flags for pressure/altitude and temperature.
        bus.write(&[MPL_PT_DATA_CFG, 0x07]).map_err(i2c_err)?;
        bus.write(&[MPL_CTRL_REG1, MPL_ALT | MPL_OS128]).map_err(i2c_err)?;
        Ok(())
    }

    async fn read_measurements(&self) -> Result<Measurements> {
        let alt = self.mpl_one_shot(true).await?;
        let altitude_m =
            f64::from(i16::from_be_bytes([alt[0], alt[1]])) + f64::from(alt[2] >> 4) / 16.0;

        let bar = self.mpl_one_shot(false).await?;
        let pressure_pa = f64::from(
            (u32::from(bar[0]) << 16 | u32::from(bar[1]) << 8 | u32::from(bar[2])) >> 6,
        ) + f64::from((bar[2] >> 4) & 0x03) / 4.0;

        let raw_temp = self.htu_measure(HTU_MEASURE_TEMP).await?;
        let temperature_c = -46.85 + 175.72 * f64::from(raw_temp) / 65536.0;

        let raw_humidity = self.htu_measure(HTU_MEASURE_HUMIDITY).await?;
        let humidity_percent = -6.0 + 125.0 * f64::from(raw_humidity) / 65536.0;

        Ok(Measurements {
            altitude_m,
            pressure_kpa: pressure_pa / 1000.0,
            temperature_c,
            humidity_percent,
        })
    }

    async fn set_indicator(&self, on: bool) -> Result<()> {
        let mut led = self.status_led.lock().await;
        if on {
            led.set_high();
        } else {
            led.set_low();
        }
        Ok(())
    }
}

fn i2c_err(e: rppal::i2c::Error) -> StationError {
    StationError::sensor_error(format!("I2C transfer failed: {}", e))
}
