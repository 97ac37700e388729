//! Real stop locations around Leiria, Portugal (from OpenStreetMap).

pub type Location = (f64, f64);

pub const CASTLE: Location = (39.7477, -8.8090);
pub const CATHEDRAL: Location = (39.7446, -8.8064);
pub const MARKET: Location = (39.7452, -8.8058);
pub const STADIUM: Location = (39.7524, -8.8093);
pub const HOSPITAL: Location = (39.7422, -8.8160);
pub const POLYTECHNIC: Location = (39.7350, -8.8210);
pub const TRAIN_STATION: Location = (39.7687, -8.8044);
