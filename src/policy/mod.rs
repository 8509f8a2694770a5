mod fee_policy;

pub use fee_policy::FeePolicy;
