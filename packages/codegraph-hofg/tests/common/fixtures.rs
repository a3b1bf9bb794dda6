//! IR fixtures
//!
//! Each fixture mirrors a small C translation unit. Most use the
//! register-promoted lowering; `spilled_out_param` keeps the stack slots an
//! unoptimized compiler emits for parameters. Allocation calls sit on fixed
//! lines so tests can check reported locations.

use codegraph_hofg::shared::models::{IrModule, IrType, ModuleBuilder};

/// Line of the allocation call in single-allocation fixtures
pub const ALLOC_LINE: u32 = 10;

/// `int *q = (int *)malloc(n); free(q);`
pub fn round_trip() -> IrModule {
    let mut mb = ModuleBuilder::new("round_trip.c");
    let mut f = mb.function("main", 0);
    f.at_line(ALLOC_LINE);
    let p = f.call("malloc", &[]);
    let q = f.cast(p);
    let r = f.cast(q);
    f.call_void("free", &[r]);
    f.ret(None);
    f.finish();
    mb.build()
}

/// `malloc(n);` with the result dropped
pub fn unused_allocation() -> IrModule {
    let mut mb = ModuleBuilder::new("unused.c");
    let mut f = mb.function("main", 0);
    f.at_line(ALLOC_LINE);
    f.call("malloc", &[]);
    f.ret(None);
    f.finish();
    mb.build()
}

/// `void f(int **out) { *out = malloc(n); }` plus a caller `g` doing
/// `int *x; f(&x);` and, when `freed`, `free(x);`
pub fn out_param(freed: bool) -> IrModule {
    let mut mb = ModuleBuilder::new("out_param.c");

    let mut f = mb.function("f", 1);
    let out = f.param(0);
    f.at_line(ALLOC_LINE);
    let p = f.call("malloc", &[]);
    f.store(p, out);
    f.ret(None);
    f.finish();

    let mut g = mb.function("g", 0);
    g.at_line(20);
    let x = g.alloca();
    g.call_void("f", &[x]);
    if freed {
        let y = g.load(x, IrType::Pointer);
        g.call_void("free", &[y]);
    }
    g.ret(None);
    g.finish();

    mb.build()
}

/// `out_param` as lowered without optimization: `out` is spilled to a stack
/// slot and reloaded before the store, and the caller frees through a cast
pub fn spilled_out_param(freed: bool) -> IrModule {
    let mut mb = ModuleBuilder::new("spilled_out.c");

    let mut f = mb.function("f", 1);
    let out = f.param(0);
    let slot = f.alloca();
    f.store(out, slot);
    f.at_line(ALLOC_LINE);
    let p = f.call("malloc", &[]);
    let c = f.cast(p);
    let reloaded = f.load(slot, IrType::Pointer);
    f.store(c, reloaded);
    f.ret(None);
    f.finish();

    let mut g = mb.function("g", 0);
    g.at_line(20);
    let x = g.alloca();
    g.call_void("f", &[x]);
    if freed {
        let y = g.load(x, IrType::Pointer);
        let arg = g.cast(y);
        g.call_void("free", &[arg]);
    }
    g.ret(None);
    g.finish();

    mb.build()
}

/// `p = malloc(n); if (cond) free(p);`
pub fn conditional_free() -> IrModule {
    let mut mb = ModuleBuilder::new("cond.c");
    let mut f = mb.function("main", 0);
    let then_block = f.block();
    let exit = f.block();

    f.at_line(ALLOC_LINE);
    let p = f.call("malloc", &[]);
    let q = f.cast(p);
    let cond = f.op("icmp", &[q]);
    f.cond_br(cond, then_block, exit);

    f.switch_to(then_block);
    let r = f.cast(q);
    f.call_void("free", &[r]);
    f.br(exit);

    f.switch_to(exit);
    f.ret(None);
    f.finish();
    mb.build()
}

/// `static char *cache;` filled by `init()` from `main`; when `freed`, a
/// `shutdown()` releasing it exists and `main` calls it
pub fn global_cache(freed: bool) -> IrModule {
    let mut mb = ModuleBuilder::new("cache.c");
    let cache = mb.global("cache");

    let mut init = mb.function("init", 0);
    init.at_line(ALLOC_LINE);
    let p = init.call("malloc", &[]);
    init.store(p, cache);
    init.ret(None);
    init.finish();

    if freed {
        let mut shutdown = mb.function("shutdown", 0);
        shutdown.at_line(20);
        let v = shutdown.load(cache, IrType::Pointer);
        shutdown.call_void("free", &[v]);
        shutdown.ret(None);
        shutdown.finish();
    }

    let mut main = mb.function("main", 0);
    main.at_line(30);
    main.call_void("init", &[]);
    if freed {
        main.call_void("shutdown", &[]);
    }
    main.ret(None);
    main.finish();

    mb.build()
}

/// `void release(T *p) { free(p); release(p); }` called on a fresh object
pub fn self_recursive_release() -> IrModule {
    let mut mb = ModuleBuilder::new("release.c");

    let mut release = mb.function("release", 1);
    let p = release.param(0);
    release.call_void("free", &[p]);
    release.call_void("release", &[p]);
    release.ret(None);
    release.finish();

    let mut main = mb.function("main", 0);
    main.at_line(ALLOC_LINE);
    let obj = main.call("malloc", &[]);
    let q = main.cast(obj);
    main.call_void("release", &[q]);
    main.ret(None);
    main.finish();

    mb.build()
}

/// `ping(p) { pong(p); }`, `pong(p) { free(p); ping(p); }`, `main` passes a
/// fresh object to `ping`
pub fn mutual_recursion() -> IrModule {
    let mut mb = ModuleBuilder::new("pingpong.c");

    let mut ping = mb.function("ping", 1);
    let p = ping.param(0);
    ping.call_void("pong", &[p]);
    ping.ret(None);
    ping.finish();

    let mut pong = mb.function("pong", 1);
    let p = pong.param(0);
    pong.call_void("free", &[p]);
    pong.call_void("ping", &[p]);
    pong.ret(None);
    pong.finish();

    let mut main = mb.function("main", 0);
    main.at_line(ALLOC_LINE);
    let obj = main.call("malloc", &[]);
    let q = main.cast(obj);
    main.call_void("ping", &[q]);
    main.ret(None);
    main.finish();

    mb.build()
}

/// The object escapes through a function pointer call
pub fn indirect_call() -> IrModule {
    let mut mb = ModuleBuilder::new("indirect.c");
    let mut f = mb.function("main", 0);
    f.at_line(ALLOC_LINE);
    let p = f.call("malloc", &[]);
    let q = f.cast(p);
    f.call_indirect(&[q]);
    f.ret(None);
    f.finish();
    mb.build()
}

/// `log_msg(fmt, ...)` called with an extra argument, then `free`
pub fn variadic_call() -> IrModule {
    let mut mb = ModuleBuilder::new("variadic.c");

    let mut log = mb.function("log_msg", 1);
    log.ret(None);
    log.finish();

    let mut main = mb.function("main", 0);
    main.at_line(ALLOC_LINE);
    let p = main.call("malloc", &[]);
    let q = main.cast(p);
    main.call_void("log_msg", &[q, q]);
    let r = main.cast(q);
    main.call_void("free", &[r]);
    main.ret(None);
    main.finish();

    mb.build()
}

/// `void *xmalloc(n) { return malloc(n); }` and `free(xmalloc(n))`
pub fn wrapper_allocation() -> IrModule {
    let mut mb = ModuleBuilder::new("xmalloc.c");

    let mut wrapper = mb.function("xmalloc", 0);
    wrapper.returns(IrType::Pointer);
    wrapper.at_line(ALLOC_LINE);
    let p = wrapper.call("malloc", &[]);
    wrapper.ret(Some(p));
    wrapper.finish();

    let mut main = mb.function("main", 0);
    main.at_line(20);
    let q = main.call("xmalloc", &[]);
    main.call_void("free", &[q]);
    main.ret(None);
    main.finish();

    mb.build()
}

/// `T *make() { return malloc(n); }`; `main` calls it and, when `freed`,
/// frees the result
pub fn returned_allocation(freed: bool) -> IrModule {
    let mut mb = ModuleBuilder::new("make.c");

    let mut make = mb.function("make", 0);
    make.returns(IrType::Pointer);
    make.at_line(ALLOC_LINE);
    let p = make.call("malloc", &[]);
    make.ret(Some(p));
    make.finish();

    let mut main = mb.function("main", 0);
    main.at_line(20);
    let q = main.call("make", &[]);
    if freed {
        main.call_void("free", &[q]);
    }
    main.ret(None);
    main.finish();

    mb.build()
}

/// Functions without any pointer traffic
pub fn no_heap_traffic() -> IrModule {
    let mut mb = ModuleBuilder::new("plain.c");

    let mut helper = mb.function("helper", 0);
    let a = helper.op("add", &[]);
    helper.op("mul", &[a]);
    helper.ret(None);
    helper.finish();

    let mut main = mb.function("main", 0);
    main.alloca();
    main.ret(None);
    main.finish();

    mb.build()
}
