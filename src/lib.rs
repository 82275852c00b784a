//! Biblioteca Rust para el módulo de movimiento InvenSense ICM20948
//!
//! El ICM20948 son en realidad dos chips: el principal contiene el
//! acelerómetro y el giroscopio, y un AK09916 aparte contiene el
//! magnetómetro. El AK09916 solo es alcanzable a través del master I2C
//! secundario del chip principal, así que este driver programa ese
//! passthrough y lee los resultados desde los registros sombra.
//!
//! El ciclo de vida del dispositivo es dirigido por el llamante:
//! [`Icm20948::reset`] (con su espera de arranque), despertar, verificación
//! de identidad, configuración de escalas y [`Icm20948::mag_init`] dejan el
//! chip configurado; [`Icm20948::initialize`] encadena esos pasos. A partir
//! de ahí las lecturas repetidas no cambian el estado y el sondeo corre a
//! cargo del llamante.
//!
//! Ninguna operación es segura frente a accesos concurrentes sobre el mismo
//! handle: las secuencias read-modify-write deben serializarse desde fuera.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Importaciones internas
pub mod compass;
pub mod conversion;
pub mod device;
pub mod interface;
pub mod orientation;
pub mod register;
pub mod types;

// Re-exports públicos
pub use compass::SlaveTransaction;
pub use conversion::{accel_raw_to_g, gyro_raw_to_dps, temp_raw_to_celsius};
pub use device::{ConfigStage, Icm20948, Icm20948Error};
pub use orientation::{azimuth_degrees, elevation_degrees};
pub use types::{
    AccelFullScale, GyroFullScale, RawVector, Vector3, ICM20948_I2C_ADDR, ICM20948_I2C_ADDR_ALT,
};

use crate::interface::I2cInterface;

/// Crea un nuevo dispositivo ICM20948 usando el bus I2C
pub fn new_i2c_device<I, D, E>(i2c: I, address: u8, delay: D) -> Icm20948<I2cInterface<I>, D>
where
    I: I2c<Error = E>,
    D: DelayNs,
{
    let interface = I2cInterface::new(i2c, address);
    Icm20948::new(interface, delay)
}
