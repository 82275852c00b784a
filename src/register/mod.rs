//! Definiciones de registros para el ICM20948
//!
//! El chip reutiliza las direcciones de registro en cuatro bancos; el
//! registro `REG_BANK_SEL` (0x7F) existe idéntico en todos ellos y decide
//! cuál está activo. No se incluye todo el datasheet, solo los bancos y
//! registros que este driver toca.

/// Registros del Banco 0
pub mod bank0 {
    // Identificación
    pub const WHO_AM_I: u8 = 0x00;
    /// Valor esperado en WHO_AM_I
    pub const WHO_AM_I_VAL: u8 = 0xEA;

    // Control del master I2C auxiliar y gestión de energía
    pub const USER_CTRL: u8 = 0x03;
    pub const LP_CONFIG: u8 = 0x05;
    pub const PWR_MGMT_1: u8 = 0x06;
    pub const PWR_MGMT_2: u8 = 0x07;
    pub const INT_PIN_CFG: u8 = 0x0F;
    pub const I2C_MST_STATUS: u8 = 0x17;

    // Datos de acelerómetro (big-endian, par alto/bajo por eje)
    pub const ACCEL_XOUT_H: u8 = 0x2D;
    pub const ACCEL_XOUT_L: u8 = 0x2E;
    pub const ACCEL_YOUT_H: u8 = 0x2F;
    pub const ACCEL_YOUT_L: u8 = 0x30;
    pub const ACCEL_ZOUT_H: u8 = 0x31;
    pub const ACCEL_ZOUT_L: u8 = 0x32;

    // Datos de giroscopio (big-endian)
    pub const GYRO_XOUT_H: u8 = 0x33;
    pub const GYRO_XOUT_L: u8 = 0x34;
    pub const GYRO_YOUT_H: u8 = 0x35;
    pub const GYRO_YOUT_L: u8 = 0x36;
    pub const GYRO_ZOUT_H: u8 = 0x37;
    pub const GYRO_ZOUT_L: u8 = 0x38;

    // Temperatura
    pub const TEMP_OUT_H: u8 = 0x39;
    pub const TEMP_OUT_L: u8 = 0x3A;

    // Bloque sombra: copia de la última lectura al esclavo auxiliar.
    // Sigue hasta DATA_23 en 0x52; aquí solo los que usa el magnetómetro.
    pub const EXT_SLV_SENS_DATA_00: u8 = 0x3B;
    pub const EXT_SLV_SENS_DATA_01: u8 = 0x3C;
    pub const EXT_SLV_SENS_DATA_02: u8 = 0x3D;
    pub const EXT_SLV_SENS_DATA_03: u8 = 0x3E;
    pub const EXT_SLV_SENS_DATA_04: u8 = 0x3F;
    pub const EXT_SLV_SENS_DATA_05: u8 = 0x40;
    pub const EXT_SLV_SENS_DATA_06: u8 = 0x41;
    pub const EXT_SLV_SENS_DATA_07: u8 = 0x42;

    /// Selección de banco, misma dirección en los cuatro bancos
    pub const REG_BANK_SEL: u8 = 0x7F;
}

/// Registros del Banco 1 (self-test y offsets de acelerómetro)
pub mod bank1 {
    pub const SELF_TEST_X_GYRO: u8 = 0x02;
    pub const SELF_TEST_Y_GYRO: u8 = 0x03;
    pub const SELF_TEST_Z_GYRO: u8 = 0x04;
    pub const SELF_TEST_X_ACCEL: u8 = 0x0E;
    pub const SELF_TEST_Y_ACCEL: u8 = 0x0F;
    pub const SELF_TEST_Z_ACCEL: u8 = 0x10;

    pub const XA_OFFS_H: u8 = 0x14;
    pub const XA_OFFS_L: u8 = 0x15;
    pub const YA_OFFS_H: u8 = 0x17;
    pub const YA_OFFS_L: u8 = 0x18;
    pub const ZA_OFFS_H: u8 = 0x1A;
    pub const ZA_OFFS_L: u8 = 0x1B;
}

/// Registros del Banco 2 (configuración de giroscopio y acelerómetro)
pub mod bank2 {
    pub const GYRO_SMPLRT_DIV: u8 = 0x00;
    /// bits[2:1] = escala, bit[0] = habilitación del DLPF, bits[5:3] = corte
    pub const GYRO_CONFIG_1: u8 = 0x01;
    pub const GYRO_CONFIG_2: u8 = 0x02;

    pub const XG_OFFS_USRH: u8 = 0x03;
    pub const XG_OFFS_USRL: u8 = 0x04;
    pub const YG_OFFS_USRH: u8 = 0x05;
    pub const YG_OFFS_USRL: u8 = 0x06;
    pub const ZG_OFFS_USRH: u8 = 0x07;
    pub const ZG_OFFS_USRL: u8 = 0x08;

    pub const ACCEL_SMPLRT_DIV_1: u8 = 0x10;
    pub const ACCEL_SMPLRT_DIV_2: u8 = 0x11;
    /// Mismo trazado de bits que GYRO_CONFIG_1
    pub const ACCEL_CONFIG: u8 = 0x14;
    pub const ACCEL_CONFIG_2: u8 = 0x15;
}

/// Registros del Banco 3 (master I2C auxiliar)
pub mod bank3 {
    pub const I2C_MST_ODR_CONFIG: u8 = 0x00;
    pub const I2C_MST_CTRL: u8 = 0x01;
    pub const I2C_MST_DELAY_CTRL: u8 = 0x02;

    // Canal SLV0, el único que usa este driver. SLV1..SLV4 viven en
    // 0x07..0x17 con el mismo trazado.
    pub const I2C_SLV0_ADDR: u8 = 0x03;
    pub const I2C_SLV0_REG: u8 = 0x04;
    pub const I2C_SLV0_CTRL: u8 = 0x05;
    pub const I2C_SLV0_DO: u8 = 0x06;
}

/// Registros del magnetómetro AK09916, al otro lado del bus auxiliar
pub mod mag {
    /// Dirección I2C fija del AK09916 en el bus auxiliar
    pub const AK09916_I2C_ADDR: u8 = 0x0C;

    pub const WIA2: u8 = 0x01;
    pub const ST1: u8 = 0x10;
    pub const HXL: u8 = 0x11;
    pub const HXH: u8 = 0x12;
    pub const HYL: u8 = 0x13;
    pub const HYH: u8 = 0x14;
    pub const HZL: u8 = 0x15;
    pub const HZH: u8 = 0x16;
    pub const ST2: u8 = 0x18;
    pub const CNTL2: u8 = 0x31;
    pub const CNTL3: u8 = 0x32;

    // Modos de CNTL2
    pub const MODE_POWER_DOWN: u8 = 0x00;
    pub const MODE_SINGLE: u8 = 0x01;
    pub const MODE_CONT_10HZ: u8 = 0x02;
    pub const MODE_CONT_20HZ: u8 = 0x04;
    pub const MODE_CONT_50HZ: u8 = 0x06;
    pub const MODE_CONT_100HZ: u8 = 0x08;

    /// Escribir en CNTL3 dispara el soft-reset
    pub const RESET: u8 = 0x01;
}
