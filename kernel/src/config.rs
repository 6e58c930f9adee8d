//! Constants used in the kernel

/// 页大小，十六进制表示方便地址转页号的计算
pub const PAGE_SIZE: usize = 0x1000;
/// 页内寻址的位数
pub const PAGE_SIZE_BITS: usize = 12;

/// 用户空间的上界，其上全部属于内核
pub const PHYS_BASE: usize = 0xC000_0000;

/// 用户栈紧贴用户空间顶端
pub const USER_STACK_TOP: usize = PHYS_BASE;
pub const USER_STACK_SIZE: usize = PAGE_SIZE * 2;

/// 用户数据段，运行时在此存放传给系统调用的字符串与缓冲区
pub const USER_DATA_BASE: usize = 0x0804_8000;
pub const USER_DATA_SIZE: usize = PAGE_SIZE * 256;

/// 被内核终止的进程的退出码
pub const KILLED_EXIT_CODE: i32 = -1;

/// 标准输入、标准输出的文件描述符，不出现在文件描述符表中
pub const STDIN_FILENO: usize = 0;
pub const STDOUT_FILENO: usize = 1;
/// 首个可分配的文件描述符
pub const FIRST_FD: usize = 2;
