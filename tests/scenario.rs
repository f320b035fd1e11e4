extern crate ramdisk;
#[macro_use]
extern crate slog;

use ramdisk::control::code;
use ramdisk::disk::{Geometry, GEOMETRY_SIZE, SECTOR_SIZE};
use ramdisk::{Heap, MajorFunction, Options, Queue, Request, Status};

fn queue() -> Queue {
    Queue::new(&Options::default(), Heap, slog::Logger::root(slog::Discard, o!())).unwrap()
}

#[test]
fn write_read_geometry() {
    let mut queue = queue();

    let data = [0xAB; 512];
    let completion = queue.submit(Request::write(0, &data));
    assert_eq!(completion.status, Status::Success);
    assert_eq!(completion.information, 512);

    let mut buf = [0; 512];
    let completion = queue.submit(Request::read(0, &mut buf));
    assert_eq!(completion.status, Status::Success);
    assert_eq!(completion.information, 512);
    assert!(buf.iter().all(|&x| x == 0xAB));

    let completion = queue.submit(Request::device_control(code::DISK_GET_DRIVE_GEOMETRY, &[], &mut []));
    assert_eq!(completion.status, Status::BufferTooSmall);
    assert_eq!(completion.information, GEOMETRY_SIZE);
}

#[test]
fn round_trip_ranges() {
    let mut queue = queue();
    let disk_size = queue.device().info().disk_size;

    let ranges = [(0, SECTOR_SIZE), (SECTOR_SIZE, 4 * SECTOR_SIZE), (7, 2 * SECTOR_SIZE),
                  (disk_size - SECTOR_SIZE, SECTOR_SIZE), (0, disk_size)];
    for (n, &(offset, length)) in ranges.iter().enumerate() {
        let data: Vec<u8> = (0..length).map(|i| (i * 31 + n) as u8).collect();
        assert_eq!(queue.submit(Request::write(offset as i64, &data)).status, Status::Success);

        let mut buf = vec![0; length];
        let completion = queue.submit(Request::read(offset as i64, &mut buf));
        assert_eq!(completion.information, length);
        assert_eq!(buf, data);
    }
}

#[test]
fn invalid_transfers_leave_disk_alone() {
    let mut queue = queue();
    let disk_size = queue.device().info().disk_size as i64;

    let data = [0x11; SECTOR_SIZE];
    queue.submit(Request::write(0, &data));

    let junk = [0xEE; 2 * SECTOR_SIZE];
    for &(offset, length) in &[(-512, SECTOR_SIZE), (0, 100), (disk_size - 512, 2 * SECTOR_SIZE),
                               (i64::max_value(), SECTOR_SIZE), (disk_size, SECTOR_SIZE)] {
        let completion = queue.submit(Request::write(offset, &junk[..length]));
        assert_eq!(completion.status, Status::InvalidParameter);
        assert_eq!(completion.information, 0);
    }

    let mut buf = [0; SECTOR_SIZE];
    queue.submit(Request::read(0, &mut buf));
    assert!(buf.iter().all(|&x| x == 0x11));

    let mut buf = [0; SECTOR_SIZE];
    queue.submit(Request::read(disk_size - 512, &mut buf));
    assert!(buf.iter().all(|&x| x == 0));
}

#[test]
fn control_plane() {
    let mut queue = queue();

    // Unknown codes.
    let mut out = [0; 64];
    let completion = queue.submit(Request::device_control(0x0012_3456, &[], &mut out));
    assert_eq!(completion.status, Status::InvalidDeviceRequest);
    assert_eq!(completion.information, 0);

    // The geometry never describes more than the disk.
    let mut out = [0; GEOMETRY_SIZE];
    let completion = queue.submit(Request::device_control(code::DISK_GET_DRIVE_GEOMETRY, &[], &mut out));
    assert_eq!(completion.information, GEOMETRY_SIZE);
    let geometry = Geometry::new(queue.device().info().disk_size);
    assert_eq!(*queue.device().geometry(), geometry);
    assert!(geometry.capacity() <= queue.device().info().disk_size as u64);

    // Partition type updates are reported back.
    let completion = queue.submit(Request::device_control(code::DISK_SET_PARTITION_INFO, &[0x83], &mut []));
    assert_eq!(completion.status, Status::Success);
    let mut out = [0; 32];
    queue.submit(Request::device_control(code::DISK_GET_PARTITION_INFO, &[], &mut out));
    assert_eq!(out[24], 0x83);

    // Identity, header only.
    let mut out = [0; 8];
    let completion = queue.submit(Request::device_control(code::MOUNTDEV_QUERY_DEVICE_NAME, &[], &mut out));
    assert_eq!(completion.status, Status::BufferOverflow);
    assert_eq!(completion.status.code(), 0x8000_0005);
    assert_eq!(completion.information, 4);
    let required = 2 + (out[0] as usize | (out[1] as usize) << 8);
    assert_eq!(required, 32);

    // Identity, retried with the derived size.
    let mut out = vec![0; required];
    let completion = queue.submit(Request::device_control(code::MOUNTDEV_QUERY_DEVICE_NAME, &[], &mut out));
    assert_eq!(completion.status, Status::Success);
    assert_eq!(completion.information, required);
    let name: Vec<u16> = out[2..].chunks(2).map(|c| c[0] as u16 | (c[1] as u16) << 8).collect();
    assert_eq!(String::from_utf16(&name).unwrap(), "\\Device\\Ramdisk");
}

#[test]
fn other_categories() {
    let mut queue = queue();

    for &major in &[MajorFunction::Create, MajorFunction::Close, MajorFunction::Pnp, MajorFunction::Power] {
        let completion = queue.submit(Request::other(major));
        assert_eq!(completion.status, Status::InvalidDeviceRequest);
        assert_eq!(completion.information, 0);
    }
}
