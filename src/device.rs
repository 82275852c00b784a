//! Driver del ICM20948: gestión de bancos, energía, identidad,
//! configuración de escalas y filtros, y lecturas de acelerómetro,
//! giroscopio y temperatura.
//!
//! El handle no cachea ningún estado del chip: cada consulta de
//! configuración va al dispositivo, y cada grupo de accesos direccionados
//! reselecciona su banco justo antes de tocarlo. El acceso concurrente a
//! un mismo handle no está protegido; las secuencias read-modify-write
//! deben serializarse desde fuera.

use crate::conversion::{accel_raw_to_g, gyro_raw_to_dps, raw_from_be_bytes, temp_raw_to_celsius};
use crate::interface::Interface;
use crate::register::{bank0, bank2};
use crate::types::{bits, AccelFullScale, GyroFullScale, RawVector, Vector3};
use embedded_hal::delay::DelayNs;

/// Etapas de las secuencias de configuración multi-escritura
///
/// Ninguna secuencia hace rollback: si una etapa falla, las anteriores
/// quedan aplicadas y el llamante decide si repite lo que falta o la
/// secuencia entera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStage {
    /// Bit de DLPF en ACCEL_CONFIG
    AccelDlpf,
    /// Bit de DLPF en GYRO_CONFIG_1
    GyroDlpf,
    /// Reset del master I2C auxiliar (USER_CTRL bit 1)
    MasterReset,
    /// Habilitación del master I2C auxiliar (USER_CTRL bit 5)
    MasterEnable,
    /// Reloj del master auxiliar (I2C_MST_CTRL)
    MasterClock,
    /// Modo duty-cycle del master (LP_CONFIG)
    MasterDutyCycle,
    /// Cadencia de salida del master (I2C_MST_ODR_CONFIG)
    MasterOdr,
    /// Soft-reset del magnetómetro vía passthrough
    MagReset,
    /// Modo de medición continua del magnetómetro
    MagMode,
    /// Disparo de la copia sombra
    MagShadowTrigger,
}

/// Errores del driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icm20948Error {
    /// Fallo de transacción del bus; aborta la operación multi-paso en curso
    InterfaceError,
    /// Parámetro rechazado antes de generar tráfico de bus
    InvalidParameter,
    /// WHO_AM_I no coincide con el valor esperado; lleva el byte leído
    WhoAmIError(u8),
    /// Secuencia multi-escritura fallida a mitad, sin rollback
    PartialConfiguration(ConfigStage),
}

impl Icm20948Error {
    pub(crate) fn from_error<E>(_error: E) -> Self {
        Icm20948Error::InterfaceError
    }
}

/// Handle del dispositivo ICM20948
///
/// Posee la interfaz de bus (que guarda la dirección pre-desplazada) y el
/// proveedor de retardos. Se crea con [`Icm20948::new`] y se destruye con
/// [`Icm20948::release`].
pub struct Icm20948<I, D> {
    pub(crate) interface: I,
    pub(crate) delay: D,
}

impl<I, D, E> Icm20948<I, D>
where
    I: Interface<Error = E>,
    D: DelayNs,
{
    /// Crea un nuevo handle sobre una interfaz ya construida
    pub fn new(interface: I, delay: D) -> Self {
        Self { interface, delay }
    }

    /// Consume el handle y devuelve la interfaz y el proveedor de retardos
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    /// Lee un registro del banco actualmente seleccionado
    pub(crate) fn read_reg(&mut self, reg: u8) -> Result<u8, Icm20948Error> {
        let mut buf = [0u8];
        self.interface
            .read_reg(reg, &mut buf)
            .map_err(Icm20948Error::from_error)?;
        Ok(buf[0])
    }

    /// Lee varios registros consecutivos del banco actual
    pub(crate) fn read_regs(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Icm20948Error> {
        self.interface
            .read_reg(reg, data)
            .map_err(Icm20948Error::from_error)
    }

    /// Escribe un registro del banco actual
    pub(crate) fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Icm20948Error> {
        self.interface
            .write_reg(reg, &[value])
            .map_err(Icm20948Error::from_error)
    }

    /// Read-modify-write de un registro del banco actual
    pub(crate) fn modify_reg<F>(&mut self, reg: u8, f: F) -> Result<(), Icm20948Error>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_reg(reg)?;
        let new_value = f(value);
        log::trace!("reg {:#04x}: {:#010b} -> {:#010b}", reg, value, new_value);
        self.write_reg(reg, new_value)
    }

    /// Selecciona el banco de registros activo
    ///
    /// Con `bank > 3` falla con `InvalidParameter` sin tocar el bus. No hay
    /// verificación por relectura ni caché del último banco: la corrección
    /// depende de que cada grupo de accesos reseleccione antes de operar.
    pub fn set_bank(&mut self, bank: u8) -> Result<(), Icm20948Error> {
        if bank > 3 {
            return Err(Icm20948Error::InvalidParameter);
        }
        self.write_reg(bank0::REG_BANK_SEL, (bank << 4) & 0x30)
    }

    /// Resetea el chip activando el bit H_RESET
    ///
    /// El llamante debe esperar ~10 ms antes de la siguiente operación para
    /// que el chip termine de arrancar.
    pub fn reset(&mut self) -> Result<(), Icm20948Error> {
        self.set_bank(0)?;
        self.modify_reg(bank0::PWR_MGMT_1, |v| v | bits::H_RESET)
    }

    /// Saca al chip del modo de bajo consumo
    pub fn wake_up(&mut self) -> Result<(), Icm20948Error> {
        self.set_bank(0)?;
        self.modify_reg(bank0::PWR_MGMT_1, |v| v & !bits::SLEEP)
    }

    /// Pone el chip en modo de bajo consumo
    pub fn sleep(&mut self) -> Result<(), Icm20948Error> {
        self.set_bank(0)?;
        self.modify_reg(bank0::PWR_MGMT_1, |v| v | bits::SLEEP)
    }

    /// Lee el registro de identidad WHO_AM_I
    pub fn get_whoami(&mut self) -> Result<u8, Icm20948Error> {
        self.set_bank(0)?;
        self.read_reg(bank0::WHO_AM_I)
    }

    /// Verifica la identidad del chip contra el valor del datasheet
    pub fn check_whoami(&mut self) -> Result<(), Icm20948Error> {
        let id = self.get_whoami()?;
        if id != bank0::WHO_AM_I_VAL {
            log::warn!("WHO_AM_I {:#04x}, esperado {:#04x}", id, bank0::WHO_AM_I_VAL);
            return Err(Icm20948Error::WhoAmIError(id));
        }
        Ok(())
    }

    /// Configura la escala completa del giroscopio
    pub fn set_gyro_fullscale(&mut self, fs: GyroFullScale) -> Result<(), Icm20948Error> {
        self.set_bank(2)?;
        self.modify_reg(bank2::GYRO_CONFIG_1, |v| {
            (v & !bits::FS_SEL_MASK) | ((fs as u8) << 1)
        })
    }

    /// Lee la escala completa del giroscopio configurada en el chip
    pub fn get_gyro_fullscale(&mut self) -> Result<GyroFullScale, Icm20948Error> {
        self.set_bank(2)?;
        let v = self.read_reg(bank2::GYRO_CONFIG_1)?;
        Ok(GyroFullScale::from((v & bits::FS_SEL_MASK) >> 1))
    }

    /// Configura la escala completa del acelerómetro
    pub fn set_accel_fullscale(&mut self, fs: AccelFullScale) -> Result<(), Icm20948Error> {
        self.set_bank(2)?;
        self.modify_reg(bank2::ACCEL_CONFIG, |v| {
            (v & !bits::FS_SEL_MASK) | ((fs as u8) << 1)
        })
    }

    /// Lee la escala completa del acelerómetro configurada en el chip
    pub fn get_accel_fullscale(&mut self) -> Result<AccelFullScale, Icm20948Error> {
        self.set_bank(2)?;
        let v = self.read_reg(bank2::ACCEL_CONFIG)?;
        Ok(AccelFullScale::from((v & bits::FS_SEL_MASK) >> 1))
    }

    /// Selecciona el corte del filtro paso bajo del giroscopio (código 0..=7)
    pub fn set_gyro_dlpf(&mut self, cutoff: u8) -> Result<(), Icm20948Error> {
        if cutoff > 7 {
            return Err(Icm20948Error::InvalidParameter);
        }
        self.set_bank(2)?;
        self.modify_reg(bank2::GYRO_CONFIG_1, |v| {
            (v & !bits::DLPF_CFG_MASK) | (cutoff << 3)
        })
    }

    /// Selecciona el corte del filtro paso bajo del acelerómetro (código 0..=7)
    pub fn set_accel_dlpf(&mut self, cutoff: u8) -> Result<(), Icm20948Error> {
        if cutoff > 7 {
            return Err(Icm20948Error::InvalidParameter);
        }
        self.set_bank(2)?;
        self.modify_reg(bank2::ACCEL_CONFIG, |v| {
            (v & !bits::DLPF_CFG_MASK) | (cutoff << 3)
        })
    }

    /// Habilita o deshabilita el filtro paso bajo de ambos sensores
    ///
    /// Escribe ACCEL_CONFIG y después GYRO_CONFIG_1. Si la primera escritura
    /// funciona y la segunda falla no se deshace nada: el error indica la
    /// etapa fallida y el llamante debe repetir la que quede pendiente.
    pub fn enable_dlpf(&mut self, enable: bool) -> Result<(), Icm20948Error> {
        self.set_bank(2)?;

        self.modify_reg(bank2::ACCEL_CONFIG, |v| {
            if enable {
                v | bits::DLPF_EN
            } else {
                v & !bits::DLPF_EN
            }
        })
        .map_err(|_| Icm20948Error::PartialConfiguration(ConfigStage::AccelDlpf))?;

        self.modify_reg(bank2::GYRO_CONFIG_1, |v| {
            if enable {
                v | bits::DLPF_EN
            } else {
                v & !bits::DLPF_EN
            }
        })
        .map_err(|_| Icm20948Error::PartialConfiguration(ConfigStage::GyroDlpf))
    }

    /// Lee una muestra cruda del acelerómetro
    ///
    /// No cambia de banco: el llamante debe tener seleccionado el banco 0.
    pub fn get_raw_accel(&mut self) -> Result<RawVector, Icm20948Error> {
        let mut data = [0u8; 6];
        self.read_regs(bank0::ACCEL_XOUT_H, &mut data)?;
        Ok(raw_from_be_bytes(&data))
    }

    /// Lee una muestra cruda del giroscopio
    ///
    /// No cambia de banco: el llamante debe tener seleccionado el banco 0.
    pub fn get_raw_gyro(&mut self) -> Result<RawVector, Icm20948Error> {
        let mut data = [0u8; 6];
        self.read_regs(bank0::GYRO_XOUT_H, &mut data)?;
        Ok(raw_from_be_bytes(&data))
    }

    /// Lee el acelerómetro en g, con la escala configurada en el chip
    pub fn get_accel(&mut self) -> Result<Vector3, Icm20948Error> {
        let fs = self.get_accel_fullscale()?;
        self.set_bank(0)?;
        let raw = self.get_raw_accel()?;
        Ok(accel_raw_to_g(raw, fs))
    }

    /// Lee el giroscopio en grados/segundo, con la escala configurada en el chip
    pub fn get_gyro(&mut self) -> Result<Vector3, Icm20948Error> {
        let fs = self.get_gyro_fullscale()?;
        self.set_bank(0)?;
        let raw = self.get_raw_gyro()?;
        Ok(gyro_raw_to_dps(raw, fs))
    }

    /// Lee el valor crudo del sensor de temperatura
    pub fn get_raw_temp(&mut self) -> Result<i16, Icm20948Error> {
        self.set_bank(0)?;
        let mut data = [0u8; 2];
        self.read_regs(bank0::TEMP_OUT_H, &mut data)?;
        Ok(i16::from_be_bytes(data))
    }

    /// Lee la temperatura del die en grados Celsius
    pub fn get_temp(&mut self) -> Result<f32, Icm20948Error> {
        let raw = self.get_raw_temp()?;
        Ok(temp_raw_to_celsius(raw))
    }

    /// Secuencia completa de puesta en marcha
    ///
    /// Reset, espera de arranque, wake, verificación de identidad,
    /// escalas y arranque del magnetómetro auxiliar. Deja el dispositivo
    /// configurado y midiendo; a partir de aquí las lecturas repetidas no
    /// cambian el estado.
    pub fn initialize(
        &mut self,
        accel_fs: AccelFullScale,
        gyro_fs: GyroFullScale,
    ) -> Result<(), Icm20948Error> {
        self.reset()?;
        self.delay.delay_ms(10);
        self.wake_up()?;
        self.check_whoami()?;
        self.set_gyro_fullscale(gyro_fs)?;
        self.set_accel_fullscale(accel_fs)?;
        self.mag_init()?;
        log::info!("ICM20948 configurado");
        Ok(())
    }
}
