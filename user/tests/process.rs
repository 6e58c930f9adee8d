mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::Machine;
use user::ProgramTable;
use user::fs::*;
use user::process::*;

#[test]
fn exit_code_reaches_the_parent() {
    let programs = ProgramTable::new()
        .register("parent", |_| {
            let pid = exec("child 42").unwrap();
            assert_eq!(wait(pid), 42);
            // 每个子进程只能等待一次
            assert_eq!(wait(pid), -1);
            0
        })
        .register("child", |args| {
            assert_eq!(args, ["child", "42"]);
            exit(args[1].parse().unwrap())
        });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("parent"), Some(0));
}

#[test]
fn returning_from_main_exits() {
    let programs = ProgramTable::new().register("seven", |_| 7);
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("seven"), Some(7));
}

#[test]
fn exec_of_missing_or_invalid_program_fails() {
    let programs = ProgramTable::new().register("parent", |_| {
        assert_eq!(exec("no-such-program"), None);
        assert_eq!(exec(""), None);
        assert_eq!(exec("   "), None);

        // 内容不是可执行映像
        assert!(create("junk", 0));
        let fd = open("junk").unwrap();
        write(fd, b"not a program");
        close(fd);
        assert_eq!(exec("junk"), None);
        0
    });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("parent"), Some(0));
    assert_eq!(machine.run("no-such-program"), None);
}

#[test]
fn only_children_can_be_waited_for() {
    let programs = ProgramTable::new()
        .register("parent", |_| {
            let pid = exec("middle").unwrap();
            assert_eq!(wait(pid + 100), -1);
            assert_eq!(wait(0), -1);
            wait(pid)
        })
        .register("middle", |_| {
            let grandchild = exec("leaf").unwrap();
            assert_eq!(wait(grandchild), 3);
            5
        })
        .register("leaf", |_| 3);
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("parent"), Some(5));
}

#[test]
fn unwaited_children_still_run() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let programs = ProgramTable::new()
        .register("parent", |_| {
            for _ in 0..3 {
                exec("child").unwrap();
            }
            0
        })
        .register("child", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("parent"), Some(0));
    // 加载成功后子进程才会被计入 exec 的结果，但可能尚未运行
    while runs.load(Ordering::SeqCst) < 3 {
        std::thread::yield_now();
    }
}

#[test]
fn running_executables_cannot_be_written() {
    let programs = ProgramTable::new()
        .register("rox", |_| {
            let fd = open("rox").unwrap();
            assert_eq!(write(fd, b"patch"), Some(0));

            let pid = exec("rox-child").unwrap();
            assert_eq!(wait(pid), 0);
            // 子进程退出后它的程序文件又可以写了
            let fd = open("rox-child").unwrap();
            assert_eq!(write(fd, b"\x7fPRG"), Some(4));
            0
        })
        .register("rox-child", |_| {
            let fd = open("rox-child").unwrap();
            assert_eq!(write(fd, b"x"), Some(0));
            0
        });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("rox"), Some(0));

    // 进程退出后恢复可写
    let rox = machine.fs().open("rox").unwrap();
    assert_eq!(rox.write_at(b"\x7fPRG", 0), 4);
}

#[test]
fn exit_closes_every_descriptor() {
    let programs = ProgramTable::new().register("leaky", |_| {
        assert!(create("a", 10));
        assert!(create("b", 10));
        for _ in 0..5 {
            open("a").unwrap();
            open("b").unwrap();
        }
        exit(1)
    });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("leaky"), Some(1));
    assert_eq!(machine.fs().open_inode_count(), 0);
}

#[test]
fn panicking_program_is_killed() {
    let programs = ProgramTable::new().register("crash", |_| {
        let fd = open("crash").unwrap();
        assert_eq!(fd, 0, "deliberate failure");
        0
    });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("crash"), Some(-1));
    assert_eq!(machine.fs().open_inode_count(), 0);
}

#[test]
fn halt_stops_the_machine() {
    let programs = ProgramTable::new()
        .register("shutdown", |_| {
            exec("sleeper").unwrap();
            halt()
        })
        .register("sleeper", |_| {
            // 关机后下一次系统调用就会结束本进程
            loop {
                tell(100);
            }
        });
    let machine = Machine::boot(programs);
    assert_eq!(machine.run("shutdown"), None);
    assert!(machine.kernel.is_halted());
    assert_eq!(machine.run("sleeper"), None);
}
