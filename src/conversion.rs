//! Funciones de conversión para datos del sensor ICM20948
//!
//! Decodificación de muestras crudas y conversión a unidades físicas.
//! El acelerómetro y el giroscopio entregan cada eje en big-endian; el
//! magnetómetro AK09916 entrega little-endian. La asimetría es una
//! propiedad de los dos chips físicos y se conserva tal cual.

use crate::types::{AccelFullScale, GyroFullScale, RawVector, Vector3};

/// Decodifica tres ejes consecutivos big-endian (X, Y, Z)
///
/// # Panics
/// Si `data` tiene menos de 6 bytes (los llamantes leen bloques fijos).
pub fn raw_from_be_bytes(data: &[u8]) -> RawVector {
    RawVector {
        x: i16::from_be_bytes([data[0], data[1]]),
        y: i16::from_be_bytes([data[2], data[3]]),
        z: i16::from_be_bytes([data[4], data[5]]),
    }
}

/// Decodifica tres ejes consecutivos little-endian (X, Y, Z)
pub fn raw_from_le_bytes(data: &[u8]) -> RawVector {
    RawVector {
        x: i16::from_le_bytes([data[0], data[1]]),
        y: i16::from_le_bytes([data[2], data[3]]),
        z: i16::from_le_bytes([data[4], data[5]]),
    }
}

/// Convierte una muestra cruda de acelerómetro a g según la escala
pub fn accel_raw_to_g(raw: RawVector, scale: AccelFullScale) -> Vector3 {
    let sensitivity = scale.sensitivity();
    Vector3 {
        x: raw.x as f32 / sensitivity,
        y: raw.y as f32 / sensitivity,
        z: raw.z as f32 / sensitivity,
    }
}

/// Convierte una muestra cruda de giroscopio a grados/segundo según la escala
pub fn gyro_raw_to_dps(raw: RawVector, scale: GyroFullScale) -> Vector3 {
    let sensitivity = scale.sensitivity();
    Vector3 {
        x: raw.x as f32 / sensitivity,
        y: raw.y as f32 / sensitivity,
        z: raw.z as f32 / sensitivity,
    }
}

/// Convierte el valor crudo de temperatura a grados Celsius
///
/// Fórmula del datasheet: Temp = (TEMP_OUT - offset)/sensibilidad + 21,
/// con sensibilidad 333.87 LSB/°C.
pub fn temp_raw_to_celsius(raw: i16) -> f32 {
    (raw as f32 - 21.0) / 333.87 + 21.0
}
