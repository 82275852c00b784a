//! Estimación de orientación a partir de aceleración y campo magnético
//!
//! Cálculo puro, sin E/S: consume los vectores numéricos que producen el
//! driver y el puente auxiliar. La aceleración llega en g; el campo
//! magnético puede ir en cuentas crudas del sensor porque la escala se
//! cancela en los cocientes.

use crate::types::Vector3;

/// Elevación en grados a partir del vector de gravedad
///
/// 0° con el eje Z apuntando a -1 g, 90° con el eje Z perpendicular a la
/// gravedad y 180° con el eje Z a +1 g.
pub fn elevation_degrees(accel: Vector3) -> f32 {
    let horizontal = (accel.x * accel.x + accel.y * accel.y).sqrt();
    accel.z.atan2(horizontal).to_degrees() + 90.0
}

/// Azimut en grados respecto al eje Y del cuerpo, compensado por
/// inclinación
///
/// Proyecta la aceleración y el campo magnético sobre el eje Y y toma el
/// arco coseno del cociente, con lo que el resultado queda en [0°, 180°]:
/// dos rumbos simétricos respecto al eje de referencia producen el mismo
/// valor. Distinguirlos requeriría una formulación con atan2 que cambiaría
/// el comportamiento, así que la ambigüedad se mantiene.
///
/// Devuelve NaN si alguno de los vectores es nulo o si son paralelos.
pub fn azimuth_degrees(accel: Vector3, mag: Vector3) -> f32 {
    let (gx, gy, gz) = (accel.x, accel.y, accel.z);
    let (hx, hy, hz) = (mag.x, mag.y, mag.z);

    let cross_x = -gy * hz + gz * hy;
    let cross_y = gz * hx + gx * hz;
    let cross_z = -gx * hy - gy * hx;
    let cross_mag = (cross_x * cross_x + cross_y * cross_y + cross_z * cross_z).sqrt();

    let axis_mag = (gx * gx + gz * gz).sqrt();
    let dot = gy * (gz * hz - gx * hx) - hy * (gz * gz + gx * gx);

    (dot / (cross_mag * axis_mag)).acos().to_degrees()
}
