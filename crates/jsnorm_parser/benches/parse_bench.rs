use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsnorm_parser::parse;

// A medium-size script (~100 lines) exercising most of the accepted grammar
const JAVASCRIPT_SOURCE: &str = r#"
// Event queue with listeners
var EventQueue = function (name) {
    this.name = name;
    this.listeners = {};
    this.pending = [];
};

EventQueue.prototype.on = function (type, listener) {
    var list = this.listeners[type] || (this.listeners[type] = []);
    list[list.length] = listener;
    return this;
};

EventQueue.prototype.emit = function (type, payload) {
    var list = this.listeners[type], i, n;
    if (!list) {
        return false;
    }
    for (i = 0, n = list.length; i < n; i++) {
        try {
            list[i].call(this, payload);
        } catch (e) {
            this.pending.push({ type: type, error: e });
        }
    }
    return true;
};

function drain(queue, limit) {
    var count = 0;
    outer: while (queue.pending.length > 0) {
        var item = queue.pending.shift();
        switch (item.type) {
            case "retry":
                if (count++ >= limit) break outer;
                queue.emit(item.type, item.error);
                continue;
            case "drop":
                break;
            default:
                total += 1;
        }
    }
    return count;
}

let summarize = (queue) => {
    const counts = {};
    for (const key in queue.listeners) {
        counts[key] = queue.listeners[key].length;
    }
    return counts;
};

const double = x => x * 2;
let squares = [1, 2, 3, 4].map(x => x ** 2);

function describe(value) {
    var kind = typeof value;
    return kind === "object" ? (value === null ? "null" : "object") : kind;
}

var config = {
    retries: 3,
    "timeout-ms": 250,
    get label() { return "queue:" + this.retries; },
    set label(v) { this.retries = parseInt(v, 10) || 0; }
};

with (config) {
    retries += 1;
}

for (let value of squares) {
    if (value > 4 && value % 2 === 0) {
        console.log(describe(value), /^\d+$/.test(String(value)));
    }
}

do {
    config.retries--;
} while (config.retries > 0)

var queue = new EventQueue("main");
queue.on("retry", function (e) { throw e; }).on("drop", double);
queue.emit("retry", new Error("boom"));
drain(queue, config.retries << 1);
summarize(queue);
"#;

fn bench_parse_javascript(c: &mut Criterion) {
    c.bench_function("parse_javascript_medium", |b| {
        b.iter(|| {
            let program = parse(black_box(JAVASCRIPT_SOURCE));
            black_box(program)
        });
    });
}

criterion_group!(benches, bench_parse_javascript);
criterion_main!(benches);
