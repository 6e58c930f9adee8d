pub mod chardev;
mod console;

pub use self::{
    chardev::{CharDevice, VirtualSerial},
    console::Console,
};
