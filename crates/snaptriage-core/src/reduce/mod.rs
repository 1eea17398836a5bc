pub mod codec;
mod reducer;
pub mod schedule;

pub use codec::{ImageCodec, RasterCodec};
pub use reducer::{
    reduce, reduce_image, reduce_image_async, reduce_with, BudgetReducer, Reducer, Reduction,
};
pub use schedule::{EncodeStep, OutputKind, ReduceParams};
