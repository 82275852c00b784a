//! Puente auxiliar hacia el magnetómetro AK09916
//!
//! El AK09916 es un chip aparte dentro del módulo, alcanzable solo a
//! través del master I2C secundario del ICM20948. El driver programa el
//! canal SLV0 (dirección + registro + dato + control) y el ICM20948
//! ejecuta la transferencia por su cuenta: las lecturas no devuelven datos
//! directamente, sino que el resultado aparece en el bloque de registros
//! sombra del banco 0 a la cadencia configurada del master auxiliar.

use crate::conversion::raw_from_le_bytes;
use crate::device::{ConfigStage, Icm20948, Icm20948Error};
use crate::interface::Interface;
use crate::register::{bank0, bank3, mag};
use crate::types::{bits, RawVector};
use embedded_hal::delay::DelayNs;

/// Código de reloj del master auxiliar, ≈400 kHz
const I2C_MST_CLK_400KHZ: u8 = 0x07;
/// Código de cadencia del master auxiliar, ≈136 Hz
const I2C_MST_ODR_136HZ: u8 = 0x03;

/// Programación de una transacción por el canal SLV0
///
/// Reúne los cuatro registros que disparan una transferencia en el bus
/// auxiliar: dirección con flag de dirección, registro destino, byte de
/// salida opcional y byte de control con habilitación y longitud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaveTransaction {
    /// Dirección de 7 bits del esclavo auxiliar
    pub addr: u8,
    /// Sentido de la transferencia: lectura si es `true`
    pub read: bool,
    /// Registro del esclavo donde empieza la transferencia
    pub reg: u8,
    /// Byte de salida, solo para escrituras
    pub payload: Option<u8>,
    /// Longitud de la transferencia (bits 3:0 del control)
    pub len: u8,
}

impl SlaveTransaction {
    /// Byte para I2C_SLV0_ADDR: dirección más flag de lectura en el bit 7
    pub fn addr_byte(&self) -> u8 {
        if self.read {
            self.addr | bits::I2C_SLV_READ
        } else {
            self.addr
        }
    }

    /// Byte para I2C_SLV0_CTRL: habilitación más longitud
    pub fn ctrl_byte(&self) -> u8 {
        bits::I2C_SLV_EN | (self.len & bits::I2C_SLV_LEN_MASK)
    }
}

impl<I, D, E> Icm20948<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Programa el canal SLV0 y dispara la transacción
    fn program_slave(&mut self, txn: &SlaveTransaction) -> Result<(), Icm20948Error> {
        self.set_bank(3)?;
        self.write_reg(bank3::I2C_SLV0_ADDR, txn.addr_byte())?;
        self.write_reg(bank3::I2C_SLV0_REG, txn.reg)?;
        if let Some(payload) = txn.payload {
            self.write_reg(bank3::I2C_SLV0_DO, payload)?;
        }
        // Escribir el control habilita el canal y arranca la transferencia
        self.write_reg(bank3::I2C_SLV0_CTRL, txn.ctrl_byte())
    }

    /// Escritura de un byte en un registro del magnetómetro
    pub fn write_mag(&mut self, reg: u8, value: u8) -> Result<(), Icm20948Error> {
        self.program_slave(&SlaveTransaction {
            addr: mag::AK09916_I2C_ADDR,
            read: false,
            reg,
            payload: Some(value),
            len: 1,
        })
    }

    /// Arma una lectura del magnetómetro por el canal auxiliar
    ///
    /// Esta llamada no devuelve datos: el ICM20948 ejecuta la transferencia
    /// de forma asíncrona a la cadencia configurada del master auxiliar y
    /// copia el resultado al bloque sombra del banco 0. No hay garantía de
    /// frescura por debajo del periodo de esa cadencia.
    pub fn read_mag(&mut self, reg: u8, len: u8) -> Result<(), Icm20948Error> {
        if len > bits::I2C_SLV_LEN_MASK {
            return Err(Icm20948Error::InvalidParameter);
        }
        self.program_slave(&SlaveTransaction {
            addr: mag::AK09916_I2C_ADDR,
            read: true,
            reg,
            payload: None,
            len,
        })
    }

    /// Lee la última muestra del magnetómetro desde los registros sombra
    ///
    /// Cada eje llega little-endian (al revés que el acelerómetro y el
    /// giroscopio). Los bytes 6 y 7 del bloque son el relleno y el registro
    /// de estado ST2, no datos de eje.
    pub fn get_raw_mag(&mut self) -> Result<RawVector, Icm20948Error> {
        self.set_bank(0)?;
        let mut data = [0u8; 8];
        self.read_regs(bank0::EXT_SLV_SENS_DATA_00, &mut data)?;
        Ok(raw_from_le_bytes(&data[0..6]))
    }

    /// Puesta en marcha del magnetómetro a través del master auxiliar
    ///
    /// Secuencia ordenada y sin reintentos; el primer fallo de bus la corta
    /// indicando la etapa. Al terminar, el bloque sombra se refresca solo a
    /// ~100 Hz y [`Self::get_raw_mag`] devuelve la última copia.
    pub fn mag_init(&mut self) -> Result<(), Icm20948Error> {
        let stage = |s: ConfigStage| move |_: Icm20948Error| Icm20948Error::PartialConfiguration(s);

        // Reset y habilitación del master I2C auxiliar
        self.set_bank(0)
            .and_then(|_| self.modify_reg(bank0::USER_CTRL, |v| v | bits::I2C_MST_RST))
            .map_err(stage(ConfigStage::MasterReset))?;
        self.delay.delay_ms(10);
        self.modify_reg(bank0::USER_CTRL, |v| v | bits::I2C_MST_EN)
            .map_err(stage(ConfigStage::MasterEnable))?;

        // Reloj del master a 400 kHz
        self.set_bank(3)
            .and_then(|_| self.write_reg(bank3::I2C_MST_CTRL, I2C_MST_CLK_400KHZ))
            .map_err(stage(ConfigStage::MasterClock))?;

        // Master en modo duty-cycle
        self.set_bank(0)
            .and_then(|_| self.write_reg(bank0::LP_CONFIG, bits::I2C_MST_CYCLE))
            .map_err(stage(ConfigStage::MasterDutyCycle))?;

        // Cadencia de muestreo del master, ~136 Hz
        self.set_bank(3)
            .and_then(|_| self.write_reg(bank3::I2C_MST_ODR_CONFIG, I2C_MST_ODR_136HZ))
            .map_err(stage(ConfigStage::MasterOdr))?;

        // Soft-reset del magnetómetro y espera de arranque
        self.write_mag(mag::CNTL3, mag::RESET)
            .map_err(stage(ConfigStage::MagReset))?;
        self.delay.delay_ms(100);

        // Medición continua a 100 Hz
        self.write_mag(mag::CNTL2, mag::MODE_CONT_100HZ)
            .map_err(stage(ConfigStage::MagMode))?;

        // Primer disparo: a partir de aquí el ICM20948 copia las 8 posiciones
        // del bloque de medida a los registros sombra por su cuenta
        self.read_mag(mag::HXL, 8)
            .map_err(stage(ConfigStage::MagShadowTrigger))?;

        log::info!("magnetómetro AK09916 en modo continuo");
        Ok(())
    }
}
