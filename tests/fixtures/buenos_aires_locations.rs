//! Buenos Aires area delivery locations for realistic test fixtures.
//!
//! Coordinates are approximate street-level positions of well-known places.

/// A named location with an address and coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, address, lat, lng }
    }
}

// ============================================================================
// Ciudad Autónoma de Buenos Aires
// ============================================================================

pub const CABA: &[Location] = &[
    Location::new("Kiosco Obelisco", "Av. Corrientes 1000, CABA", -34.6037, -58.3816),
    Location::new("Librería Colón", "Cerrito 628, CABA", -34.6011, -58.3835),
    Location::new("Almacén Balcarce", "Balcarce 50, CABA", -34.6081, -58.3703),
    Location::new("Mercado San Telmo", "Bolívar 970, CABA", -34.6206, -58.3722),
    Location::new("Cantina Caminito", "Magallanes 900, La Boca", -34.6394, -58.3628),
    Location::new("Panadería Brandsen", "Brandsen 805, La Boca", -34.6356, -58.3647),
    Location::new("Florería Recoleta", "Junín 1760, Recoleta", -34.5875, -58.3934),
    Location::new("Café Alcorta", "Av. Figueroa Alcorta 3415, Palermo", -34.5770, -58.4035),
    Location::new("Vivero Sarmiento", "Av. Sarmiento 2601, Palermo", -34.5697, -58.4116),
    Location::new("Bar Serrano", "Jorge Luis Borges 1600, Palermo", -34.5889, -58.4303),
    Location::new("Kiosco Abasto", "Av. Corrientes 3247, Almagro", -34.6036, -58.4107),
    Location::new("Heladería Centenario", "Av. Díaz Vélez 4800, Caballito", -34.6066, -58.4355),
    Location::new("Farmacia Rivadavia", "Av. Rivadavia 6000, Caballito", -34.6270, -58.4390),
    Location::new("Ferretería Belgrano", "Av. Cabildo 2200, Belgrano", -34.5613, -58.4560),
    Location::new("Verdulería Núñez", "Av. del Libertador 7600, Núñez", -34.5453, -58.4498),
    Location::new("Rotisería Boedo", "Av. Boedo 900, Boedo", -34.6280, -58.4160),
    Location::new("Carnicería Flores", "Av. Rivadavia 7000, Flores", -34.6289, -58.4634),
    Location::new(
        "Dietética Villa Crespo",
        "Av. Corrientes 5400, Villa Crespo",
        -34.5965,
        -58.4379,
    ),
    Location::new("Pescadería Madero", "Juana Manso 1000, Puerto Madero", -34.6080, -58.3625),
    Location::new("Vinoteca Retiro", "Av. del Libertador 400, Retiro", -34.5920, -58.3760),
];

// ============================================================================
// La Plata
// ============================================================================

pub const LA_PLATA: &[Location] = &[
    Location::new("Almacén Plaza Moreno", "Calle 14 entre 51 y 53, La Plata", -34.9214, -57.9545),
    Location::new("Librería 7", "Calle 7 N° 800, La Plata", -34.9140, -57.9510),
    Location::new("Panadería 12", "Calle 12 N° 1200, La Plata", -34.9280, -57.9620),
    Location::new("Kiosco Diagonal 74", "Diagonal 74 N° 1500, La Plata", -34.9100, -57.9440),
    Location::new("Café Bosque", "Paseo del Bosque s/n, La Plata", -34.9080, -57.9320),
    Location::new("Ferretería 1", "Calle 1 N° 500, La Plata", -34.9040, -57.9490),
    Location::new("Farmacia 44", "Calle 44 N° 700, La Plata", -34.9170, -57.9650),
    Location::new("Verdulería 60", "Calle 60 N° 400, La Plata", -34.9260, -57.9400),
    Location::new("Heladería 20", "Calle 20 N° 1600, La Plata", -34.9340, -57.9720),
    Location::new("Rotisería 32", "Calle 32 N° 300, La Plata", -34.8980, -57.9610),
    Location::new("Pollería 66", "Calle 66 N° 900, La Plata", -34.9350, -57.9450),
    Location::new("Vinoteca 50", "Calle 50 N° 600, La Plata", -34.9190, -57.9530),
];

// ============================================================================
// Tigre
// ============================================================================

pub const TIGRE: &[Location] = &[
    Location::new("Puerto de Frutos", "Sarmiento 160, Tigre", -34.4153, -58.5792),
    Location::new("Kiosco Estación", "Av. Cazón 400, Tigre", -34.4236, -58.5797),
    Location::new("Almacén Lavalle", "Lavalle 200, Tigre", -34.4190, -58.5760),
    Location::new("Café Paseo Victorica", "Paseo Victorica 500, Tigre", -34.4130, -58.5700),
    Location::new("Panadería Liniers", "Av. Liniers 1300, Tigre", -34.4260, -58.5705),
    Location::new("Farmacia Cazón", "Av. Cazón 1100, Tigre", -34.4290, -58.5860),
    Location::new("Ferretería Italia", "Av. Italia 800, Tigre", -34.4310, -58.5780),
    Location::new("Rotisería Pereyra", "Pereyra 300, Tigre", -34.4215, -58.5845),
    Location::new("Heladería Mitre", "Av. Mitre 100, Tigre", -34.4200, -58.5730),
    Location::new("Verdulería Solís", "Solís 600, Tigre", -34.4275, -58.5920),
];

pub fn all() -> Vec<Location> {
    CABA.iter().chain(LA_PLATA).chain(TIGRE).cloned().collect()
}
