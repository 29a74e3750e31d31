use crate::VideoError;
use framegrab_base::Tensor;

/// Device properties that can be configured through [`CaptureDevice::set`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    FrameWidth,
    FrameHeight,
    Fps,
}

/// An open capture handle.
///
/// `read` blocks until the device delivers a frame. Frames are RGB tensors
/// in HWC layout `[height, width, 3]`; an empty tensor is treated as a failed
/// read by callers.
pub trait CaptureDevice: Send {
    fn is_opened(&self) -> bool;
    fn read(&mut self) -> Result<Tensor<u8>, VideoError>;
    fn set(&mut self, property: Property, value: f64) -> Result<(), VideoError>;
    fn get(&self, property: Property) -> Option<f64>;
    fn release(&mut self);
}

impl<D: CaptureDevice + ?Sized> CaptureDevice for Box<D> {
    fn is_opened(&self) -> bool {
        (**self).is_opened()
    }

    fn read(&mut self) -> Result<Tensor<u8>, VideoError> {
        (**self).read()
    }

    fn set(&mut self, property: Property, value: f64) -> Result<(), VideoError> {
        (**self).set(property, value)
    }

    fn get(&self, property: Property) -> Option<f64> {
        (**self).get(property)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
