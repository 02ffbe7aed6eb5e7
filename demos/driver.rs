//! Sequential walk through the filesystem API, mirroring a typical
//! exercise session. Run with `RUST_LOG=debug` to watch the operations.

use flatfs::FlatFs;

fn main() {
    env_logger::init();

    let fs = FlatFs::new();

    println!("creating a.txt");
    fs.create("a.txt").unwrap();
    println!("{:?}", fs.stat("a.txt").unwrap());

    let fd = fs.open("a.txt").unwrap();
    println!("opened a.txt as fd {}", fd);

    println!("writing 10 bytes");
    fs.write(fd, b"0123456789").unwrap();
    println!("{:?}", fs.stat("a.txt").unwrap());

    fs.seek(fd, 0).unwrap();
    let data = fs.read(fd, 10).unwrap();
    println!("read back {} bytes: {:?}", data.len(), data);

    println!("seeking to 30 and writing 5 bytes");
    fs.seek(fd, 30).unwrap();
    fs.write(fd, b"abcde").unwrap();
    println!("{:?}", fs.stat("a.txt").unwrap());

    println!("reading 20 bytes from offset 15 (crosses a hole)");
    fs.seek(fd, 15).unwrap();
    println!("{:?}", fs.read(fd, 20).unwrap());

    println!("truncating to 8 bytes");
    fs.truncate("a.txt", 8).unwrap();
    fs.seek(fd, 0).unwrap();
    println!("read after truncate: {:?}", fs.read(fd, 20).unwrap());

    println!("growing back to 20 bytes");
    fs.truncate("a.txt", 20).unwrap();
    fs.seek(fd, 8).unwrap();
    println!("grown region reads: {:?}", fs.read(fd, 12).unwrap());

    println!("linking b.txt to a.txt");
    fs.link("a.txt", "b.txt").unwrap();
    println!("a: {:?}", fs.stat("a.txt").unwrap());
    println!("b: {:?}", fs.stat("b.txt").unwrap());

    println!("unlinking a.txt");
    fs.unlink("a.txt").unwrap();
    println!("directory: {:?}", fs.list());
    println!("b: {:?}", fs.stat("b.txt").unwrap());

    println!("unlinking b.txt (fd still open)");
    fs.unlink("b.txt").unwrap();
    println!("stats before close: {:?}", fs.statfs());

    fs.close(fd).unwrap();
    println!("stats after close: {:?}", fs.statfs());
}
