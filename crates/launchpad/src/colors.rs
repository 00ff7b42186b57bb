//! Launchpad programmer-mode color palette indices.

pub const BLACK: u8 = 0;
pub const GREY_LO: u8 = 1;
pub const GREY_HALF: u8 = 2;
pub const WHITE: u8 = 3;

pub const RED_HI: u8 = 5;
pub const RED: u8 = 6;
pub const RED_LO: u8 = 7;

pub const AMBER_HI: u8 = 9;
pub const AMBER: u8 = 10;
pub const AMBER_LO: u8 = 11;
pub const AMBER_YELLOW: u8 = 12;

pub const YELLOW_HI: u8 = 13;
pub const YELLOW_LO: u8 = 15;

pub const LIME_GREEN: u8 = 17;
pub const GREEN_HI: u8 = 21;
pub const GREEN: u8 = 22;
pub const GREEN_LO: u8 = 23;
pub const GREEN_SPRING: u8 = 25;

pub const TURQUOISE_HI: u8 = 29;
pub const TURQUOISE_CYAN: u8 = 33;
pub const SKY_HI: u8 = 37;
pub const SKY: u8 = 38;
pub const SKY_LO: u8 = 39;
pub const CYAN: u8 = 40;

pub const OCEAN_BLUE: u8 = 43;
pub const BLUE: u8 = 45;
pub const BLUE_ORCHID: u8 = 48;
pub const ORCHID_HI: u8 = 49;
pub const ORCHID: u8 = 50;
pub const ORCHID_LO: u8 = 51;

pub const MAGENTA: u8 = 53;
pub const MAGENTA_PINK: u8 = 54;
pub const PINK_HI: u8 = 57;
pub const PINK_LO: u8 = 59;
pub const ROSE: u8 = 61;
