mod common;

use common::Machine;
use kernel::config::{PHYS_BASE, USER_DATA_BASE, USER_DATA_SIZE, USER_STACK_TOP};
use user::ProgramTable;
use user::syscall::*;
use user::{fs, mem};

/// 数据段末尾，再往后就没有映射了
const DATA_END: u32 = (USER_DATA_BASE + USER_DATA_SIZE) as u32;

fn killed(program: impl Fn() + Send + Sync + 'static) -> Option<i32> {
    let programs = ProgramTable::new().register("victim", move |_| {
        program();
        0
    });
    Machine::boot(programs).run("victim")
}

#[test]
fn null_and_kernel_pointers_kill_the_caller() {
    assert_eq!(killed(|| { sys_open(0); }), Some(-1));
    assert_eq!(killed(|| { sys_create(PHYS_BASE as u32, 0); }), Some(-1));
    assert_eq!(killed(|| { sys_exec(0); }), Some(-1));
    assert_eq!(killed(|| { sys_write(1, 0, 4); }), Some(-1));
    assert_eq!(killed(|| { sys_read(0, PHYS_BASE as u32 - 2, 4); }), Some(-1));
}

#[test]
fn unmapped_memory_kills_the_caller() {
    assert_eq!(killed(|| { sys_open(0x1000); }), Some(-1));
    assert_eq!(killed(|| { sys_remove(DATA_END); }), Some(-1));
    // 字符串一直延伸到映射之外
    assert_eq!(
        killed(|| {
            mem::store(DATA_END - 3, b"abc");
            sys_open(DATA_END - 3);
        }),
        Some(-1)
    );
}

#[test]
fn empty_buffers_outside_user_space_kill_the_caller() {
    assert_eq!(killed(|| { sys_write(1, 0, 0); }), Some(-1));
    assert_eq!(killed(|| { sys_read(0, PHYS_BASE as u32, 0); }), Some(-1));
}

#[test]
fn empty_buffers_in_user_space_transfer_nothing() {
    assert_eq!(
        killed(|| {
            let va = mem::scratch(0);
            assert_eq!(sys_write(1, va, 0), 0);
            assert_eq!(sys_read(0, va, 0), 0);
        }),
        Some(0)
    );
}

#[test]
fn partially_bad_write_writes_nothing() {
    let programs = ProgramTable::new().register("victim", |_| {
        assert!(fs::create("log", 0));
        let fd = fs::open("log").unwrap() as u32;
        mem::store(DATA_END - 10, &[1; 10]);
        sys_write(fd, DATA_END - 10, 20);
        unreachable!()
    });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("victim"), Some(-1));
    assert_eq!(machine.fs().open("log").unwrap().length(), 0);

    let programs = ProgramTable::new().register("victim", |_| {
        sys_write(1, DATA_END - 10, 20);
        unreachable!()
    });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("victim"), Some(-1));
    assert!(machine.serial.output().is_empty());
}

#[test]
fn partially_bad_read_consumes_nothing() {
    let programs = ProgramTable::new()
        .register("victim", |_| {
            sys_read(0, DATA_END - 2, 3);
            unreachable!()
        })
        .register("reader", |_| {
            let mut buf = [0; 3];
            assert_eq!(fs::read(0, &mut buf), Some(3));
            assert_eq!(&buf, b"abc");
            0
        });
    let machine = Machine::boot(programs);
    machine.serial.push_input(b"abc");
    assert_eq!(machine.run("victim"), Some(-1));
    assert_eq!(machine.run("reader"), Some(0));
}

#[test]
fn bad_stack_pointer_kills_the_caller() {
    assert_eq!(killed(|| { trap(0); }), Some(-1));
    assert_eq!(killed(|| { trap(PHYS_BASE as u32); }), Some(-1));
    // 调用号在栈顶，参数越入了内核空间
    assert_eq!(
        killed(|| {
            mem::store((USER_STACK_TOP - 4) as u32, &WRITE.to_le_bytes());
            trap((USER_STACK_TOP - 4) as u32);
        }),
        Some(-1)
    );
}

#[test]
fn unknown_syscalls_kill_the_caller() {
    assert_eq!(killed(|| { syscall(99, &[]); }), Some(-1));
}

#[test]
fn faulting_access_kills_the_caller() {
    assert_eq!(
        killed(|| {
            let mut buf = [0; 4];
            mem::load(PHYS_BASE as u32, &mut buf);
        }),
        Some(-1)
    );
}
