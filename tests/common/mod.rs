//! Transporte simulado para los tests de integración
//!
//! Implementa la interfaz del driver sobre un banco de registros en
//! memoria, registra cada operación de bus en orden y emula el motor de
//! passthrough del canal SLV0 contra un AK09916 simulado. La copia sombra
//! se ejecuta de forma inmediata al disparar el control, sin la cadencia
//! asíncrona del chip real.
#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use icm20948_compass::interface::Interface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use icm20948_compass::Icm20948;

const REG_BANK_SEL: u8 = 0x7F;
const I2C_SLV0_ADDR: u8 = 0x03;
const I2C_SLV0_REG: u8 = 0x04;
const I2C_SLV0_CTRL: u8 = 0x05;
const I2C_SLV0_DO: u8 = 0x06;
const EXT_SLV_SENS_DATA_00: u8 = 0x3B;

/// Operación registrada por el transporte simulado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Escritura de registros, con el banco activo en ese momento
    Write { bank: u8, reg: u8, data: Vec<u8> },
    /// Lectura de registros, con el banco activo en ese momento
    Read { bank: u8, reg: u8, len: usize },
    /// Marca de retardo pedida por el driver
    DelayMs(u32),
}

#[derive(Debug)]
struct BusState {
    bank: u8,
    regs: [HashMap<u8, u8>; 4],
    mag_regs: HashMap<u8, u8>,
    ops: Vec<Operation>,
    fail_write: Option<(u8, u8)>,
    fail_read: Option<(u8, u8)>,
}

impl BusState {
    fn new() -> Self {
        let mut state = Self {
            bank: 0,
            regs: Default::default(),
            mag_regs: HashMap::new(),
            ops: Vec::new(),
            fail_write: None,
            fail_read: None,
        };

        // WHO_AM_I y valor de arranque de PWR_MGMT_1 (SLEEP + CLKSEL=1)
        state.regs[0].insert(0x00, 0xEA);
        state.regs[0].insert(0x06, 0x41);

        // AK09916 simulado: identidad y datos listos
        state.mag_regs.insert(0x01, 0x09);
        state.mag_regs.insert(0x10, 0x01);

        state
    }

    /// Ejecuta la transferencia SLV0 que acaba de armarse
    fn run_passthrough(&mut self, ctrl: u8) {
        let addr = *self.regs[3].get(&I2C_SLV0_ADDR).unwrap_or(&0);
        let reg = *self.regs[3].get(&I2C_SLV0_REG).unwrap_or(&0);
        let len = ctrl & 0x0F;

        if addr & 0x80 != 0 {
            // Lectura: copiar del esclavo al bloque sombra del banco 0
            for i in 0..len {
                let value = *self.mag_regs.get(&(reg + i)).unwrap_or(&0);
                self.regs[0].insert(EXT_SLV_SENS_DATA_00 + i, value);
            }
        } else {
            // Escritura de un byte desde el registro de salida
            let payload = *self.regs[3].get(&I2C_SLV0_DO).unwrap_or(&0);
            self.mag_regs.insert(reg, payload);
        }
    }
}

/// Error del transporte simulado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockBusError;

/// Transporte simulado compartible entre el driver y el test
#[derive(Clone)]
pub struct MockBus(Rc<RefCell<BusState>>);

impl MockBus {
    /// Operaciones registradas hasta el momento
    pub fn ops(&self) -> Vec<Operation> {
        self.0.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.0.borrow_mut().ops.clear();
    }

    /// Valor actual de un registro del banco indicado
    pub fn reg(&self, bank: u8, reg: u8) -> u8 {
        *self.0.borrow().regs[bank as usize].get(&reg).unwrap_or(&0)
    }

    pub fn set_reg(&self, bank: u8, reg: u8, value: u8) {
        self.0.borrow_mut().regs[bank as usize].insert(reg, value);
    }

    /// Registro del AK09916 simulado
    pub fn mag_reg(&self, reg: u8) -> u8 {
        *self.0.borrow().mag_regs.get(&reg).unwrap_or(&0)
    }

    pub fn set_mag_reg(&self, reg: u8, value: u8) {
        self.0.borrow_mut().mag_regs.insert(reg, value);
    }

    /// Byte `i` del bloque sombra del banco 0
    pub fn ext_data(&self, i: u8) -> u8 {
        self.reg(0, EXT_SLV_SENS_DATA_00 + i)
    }

    /// Carga el bloque sombra completo
    pub fn set_shadow(&self, data: &[u8; 8]) {
        for (i, value) in data.iter().enumerate() {
            self.set_reg(0, EXT_SLV_SENS_DATA_00 + i as u8, *value);
        }
    }

    /// Escribe una muestra big-endian en los registros de acelerómetro
    pub fn set_accel_raw(&self, x: i16, y: i16, z: i16) {
        self.set_be_sample(0x2D, x, y, z);
    }

    /// Escribe una muestra big-endian en los registros de giroscopio
    pub fn set_gyro_raw(&self, x: i16, y: i16, z: i16) {
        self.set_be_sample(0x33, x, y, z);
    }

    fn set_be_sample(&self, base: u8, x: i16, y: i16, z: i16) {
        for (i, axis) in [x, y, z].into_iter().enumerate() {
            let [high, low] = axis.to_be_bytes();
            self.set_reg(0, base + 2 * i as u8, high);
            self.set_reg(0, base + 2 * i as u8 + 1, low);
        }
    }

    /// Fuerza el fallo de toda escritura al registro dado del banco dado
    pub fn fail_write_at(&self, bank: u8, reg: u8) {
        self.0.borrow_mut().fail_write = Some((bank, reg));
    }

    /// Fuerza el fallo de toda lectura al registro dado del banco dado
    pub fn fail_read_at(&self, bank: u8, reg: u8) {
        self.0.borrow_mut().fail_read = Some((bank, reg));
    }
}

impl Interface for MockBus {
    type Error = MockBusError;

    fn write_reg(&mut self, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();

        if state.fail_write == Some((state.bank, reg)) {
            return Err(MockBusError);
        }

        let bank = state.bank;
        state.ops.push(Operation::Write {
            bank,
            reg,
            data: data.to_vec(),
        });

        if reg == REG_BANK_SEL {
            state.bank = (data[0] >> 4) & 0x03;
            return Ok(());
        }

        for (i, value) in data.iter().enumerate() {
            state.regs[bank as usize].insert(reg + i as u8, *value);
        }

        // Escribir el control con el bit de habilitación dispara el motor
        // de passthrough contra el esclavo simulado
        if bank == 3 && reg == I2C_SLV0_CTRL && data[0] & 0x80 != 0 {
            state.run_passthrough(data[0]);
        }

        Ok(())
    }

    fn read_reg(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();

        if state.fail_read == Some((state.bank, reg)) {
            return Err(MockBusError);
        }

        let bank = state.bank;
        state.ops.push(Operation::Read {
            bank,
            reg,
            len: data.len(),
        });

        for (i, slot) in data.iter_mut().enumerate() {
            *slot = *state.regs[bank as usize]
                .get(&(reg + i as u8))
                .unwrap_or(&0);
        }

        Ok(())
    }
}

/// Proveedor de retardos que deja marcas en el mismo registro de operaciones
pub struct MockDelay(Rc<RefCell<BusState>>);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().ops.push(Operation::DelayMs(ns / 1_000_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().ops.push(Operation::DelayMs(us / 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().ops.push(Operation::DelayMs(ms));
    }
}

/// Construye un dispositivo sobre el transporte simulado
pub fn mock_device() -> (Icm20948<MockBus, MockDelay>, MockBus) {
    let state = Rc::new(RefCell::new(BusState::new()));
    let bus = MockBus(Rc::clone(&state));
    let delay = MockDelay(state);
    (Icm20948::new(bus.clone(), delay), bus)
}
