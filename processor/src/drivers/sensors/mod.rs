pub mod icp101xx;
pub mod opt3002;
pub mod shtc;
