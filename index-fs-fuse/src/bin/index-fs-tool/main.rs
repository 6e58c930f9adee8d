mod cli;

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use index_fs::IndexFileSystem;
use index_fs_fuse::BlockFile;

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Format { image, sectors } => {
            let fs = IndexFileSystem::format(Arc::new(BlockFile::create(&image, sectors)?));
            println!("{image:?}: {sectors} sectors, {} free", fs.free_sectors());
        }
        Command::Put {
            image,
            host_file,
            name,
        } => {
            let fs = mount(&image)?;
            let name = match name {
                Some(name) => name,
                None => host_file
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_owned)
                    .ok_or_else(|| io::Error::other("host file has no usable name"))?,
            };
            let data = fs::read(&host_file)?;
            let size = u32::try_from(data.len()).map_err(io::Error::other)?;

            fs.create(&name, 0).map_err(io::Error::other)?;
            let written = fs.open(&name).map_err(io::Error::other)?.write_at(&data, 0);
            if written < data.len() {
                // 放不下的文件不留半截
                fs.remove(&name).map_err(io::Error::other)?;
                return Err(io::Error::other(format!(
                    "{name}: only {written} of {size} bytes fit"
                )));
            }
            println!("program: {name:?} ({size} bytes)");
        }
        Command::Get { image, name, out } => {
            let fs = mount(&image)?;
            let file = fs.open(&name).map_err(io::Error::other)?;
            let mut data = vec![0; file.length() as usize];
            let size = file.read_at(&mut data, 0);
            data.truncate(size);
            match out {
                Some(out) => fs::write(out, &data)?,
                None => io::stdout().write_all(&data)?,
            }
        }
        Command::Ls { image } => {
            let fs = mount(&image)?;
            for name in fs.list() {
                let file = fs.open(&name).map_err(io::Error::other)?;
                println!("{:>8} {:>10} {name}", file.inumber(), file.length());
            }
        }
        Command::Rm { image, name } => {
            mount(&image)?.remove(&name).map_err(io::Error::other)?;
        }
        Command::Stat { image } => {
            let fs = mount(&image)?;
            let total = fs.block_device().sector_count();
            println!("sectors: {total}");
            println!("free:    {}", fs.free_sectors());
            println!("files:   {}", fs.list().len());
        }
    }

    Ok(())
}

fn mount(image: &Path) -> io::Result<Arc<IndexFileSystem>> {
    Ok(IndexFileSystem::mount(Arc::new(BlockFile::open(image)?)))
}
