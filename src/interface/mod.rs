//! Módulo de abstracción para la comunicación con el dispositivo ICM20948
//!
//! El transporte en sí (transacciones I2C con timeout acotado) pertenece al
//! entorno anfitrión; aquí solo se define la costura por la que el driver
//! lo usa.

use embedded_hal::i2c::I2c;

#[cfg(feature = "linux")]
use linux_embedded_hal::i2cdev::linux::LinuxI2CError;

/// Error genérico para interfaces de comunicación
#[derive(Debug, Clone)]
pub enum InterfaceError<E> {
    /// Error de comunicación I2C
    I2cError(E),
    /// Parámetro inválido
    InvalidParameter,
}

#[cfg(feature = "linux")]
impl From<LinuxI2CError> for InterfaceError<LinuxI2CError> {
    fn from(error: LinuxI2CError) -> Self {
        InterfaceError::I2cError(error)
    }
}

/// Trait para abstraer la comunicación con el dispositivo ICM20948
///
/// Cada operación intenta exactamente una transacción; los reintentos ante
/// fallos transitorios son responsabilidad de la capa llamante. Una
/// transacción colgada bloquea a quien llama hasta que venza el timeout del
/// bus (1000 ms en las implementaciones de Linux usadas en la demo).
pub trait Interface {
    /// Tipo de error que puede producir la interfaz
    type Error;

    /// Escribe uno o más bytes a partir de un registro
    fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Lee `data.len()` bytes a partir de un registro
    fn read_reg(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Self::Error>;
}

/// Implementación de Interface para I2C
pub struct I2cInterface<I2C> {
    i2c: I2C,
    /// Dirección base desplazada un bit a la izquierda; el bit 0 queda
    /// reservado para el flag de dirección lectura/escritura que la capa
    /// de bus añade en cada transacción.
    addr: u8,
}

impl<I2C, E> I2cInterface<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Crea una nueva interfaz I2C a partir de la dirección de 7 bits
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self {
            i2c,
            addr: addr << 1,
        }
    }

    /// Dirección de 7 bits del dispositivo
    pub fn address(&self) -> u8 {
        self.addr >> 1
    }

    /// Consume la interfaz y devuelve el dispositivo I2C subyacente
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Interface for I2cInterface<I2C>
where
    I2C: I2c<Error = E>,
{
    type Error = InterfaceError<E>;

    fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 17]; // Suficiente para todas las operaciones del driver
        if data.len() > 16 {
            return Err(InterfaceError::InvalidParameter);
        }

        buffer[0] = reg;
        buffer[1..data.len() + 1].copy_from_slice(data);

        self.i2c
            .write(self.addr >> 1, &buffer[0..data.len() + 1])
            .map_err(InterfaceError::I2cError)
    }

    fn read_reg(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.addr >> 1, &[reg], data)
            .map_err(InterfaceError::I2cError)
    }
}
