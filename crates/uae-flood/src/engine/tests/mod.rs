mod agriculture;
mod common;
mod hydropower;
