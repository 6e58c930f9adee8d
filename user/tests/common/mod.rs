use std::sync::Arc;

use block_dev::RamDisk;
use index_fs::IndexFileSystem;
use kernel::Kernel;
use kernel::drivers::VirtualSerial;
use user::ProgramTable;

pub struct Machine {
    pub kernel: Arc<Kernel>,
    pub serial: Arc<VirtualSerial>,
}

impl Machine {
    pub fn boot(programs: ProgramTable) -> Self {
        let fs = IndexFileSystem::format(Arc::new(RamDisk::new(4096)));
        programs.install(&fs).unwrap();
        let serial = Arc::new(VirtualSerial::new());
        let kernel = Kernel::boot(fs, serial.clone(), Arc::new(programs));
        Self { kernel, serial }
    }

    pub fn fs(&self) -> &Arc<IndexFileSystem> {
        self.kernel.fs()
    }

    pub fn run(&self, cmd_line: &str) -> Option<i32> {
        self.kernel.run(cmd_line)
    }
}
