pub mod features;
pub mod inference_cache;
pub mod predictor;
pub mod symmetry;

pub use features::{set_features, BoardFeatures, FEATURE_LEN, MOVE_HISTORY, NUM_STONE_FEATURES};
pub use inference_cache::{BasicInferenceCache, CacheKey, CacheStats, InferenceCache};
pub use predictor::{Inference, ModelOutput, Predictor, UniformPredictor};
pub use symmetry::{Symmetry, NUM_SYMMETRIES};
