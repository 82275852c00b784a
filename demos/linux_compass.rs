use icm20948_compass::{self, orientation, AccelFullScale, GyroFullScale, Vector3};
use linux_embedded_hal::{Delay, I2cdev};
use std::thread;
use std::time::Duration;

fn main() {
    println!("ICM20948 - Brújula con compensación de inclinación");

    // Crear instancia de I2C para Linux
    let i2c = match I2cdev::new("/dev/i2c-1") {
        Ok(i2c) => i2c,
        Err(e) => {
            eprintln!("Error al abrir dispositivo I2C: {:?}", e);
            return;
        }
    };
    let delay = Delay {};

    // Crear dispositivo ICM20948 con la dirección I2C estándar
    let mut device = icm20948_compass::new_i2c_device(i2c, icm20948_compass::ICM20948_I2C_ADDR, delay);

    // Puesta en marcha completa: reset, identidad, escalas y magnetómetro
    if let Err(e) = device.initialize(AccelFullScale::Fs16G, GyroFullScale::Fs2000Dps) {
        eprintln!("Error al inicializar el dispositivo: {:?}", e);
        return;
    }
    println!("Dispositivo inicializado correctamente");

    loop {
        let accel = match device.get_accel() {
            Ok(accel) => accel,
            Err(e) => {
                eprintln!("Error al leer el acelerómetro: {:?}", e);
                continue;
            }
        };
        let mag = match device.get_raw_mag() {
            Ok(mag) => Vector3::from(mag),
            Err(e) => {
                eprintln!("Error al leer el magnetómetro: {:?}", e);
                continue;
            }
        };

        let elevation = orientation::elevation_degrees(accel);
        let azimuth = orientation::azimuth_degrees(accel, mag);
        println!("Elevación: {:.1}°  Azimut: {:.1}°", elevation, azimuth);

        // El bloque sombra se refresca a la cadencia del master auxiliar;
        // no tiene sentido sondear más rápido
        thread::sleep(Duration::from_millis(500));
    }
}
