//! 发送给目标解释器执行的探针脚本
//!
//! 只依赖标准库（importlib.metadata），stdout 只输出一行 JSON。

pub const PROBE_SCRIPT: &str = r#"
import datetime
import json
import os


def footprint(dist):
    try:
        files = dist.files
        if not files:
            return "n/a", "n/a", 0, 0
        first = dist.locate_file(files[0])
        base = os.path.dirname(str(first)) if os.path.exists(first) else None
        if not base or not os.path.isdir(base):
            return "unknown", "unknown", 0, 0
        total = 0
        newest = 0.0
        for root, _dirs, names in os.walk(base):
            for n in names:
                try:
                    st = os.stat(os.path.join(root, n))
                except OSError:
                    continue
                total += st.st_size
                if st.st_mtime > newest:
                    newest = st.st_mtime
        size = "%.2f MB" % (total / (1024 * 1024))
        if newest > 0:
            date = datetime.datetime.fromtimestamp(newest).strftime("%Y-%m-%d %H:%M")
        else:
            date = "unknown"
        return size, date, total, newest
    except Exception:
        return "error", "error", 0, 0


try:
    import importlib.metadata as md
    data = []
    for dist in md.distributions():
        size, date, raw_size, raw_mtime = footprint(dist)
        data.append({
            "name": dist.metadata["Name"] or "",
            "version": dist.version or "",
            "size": size,
            "date": date,
            "raw_size": raw_size,
            "raw_mtime": raw_mtime,
        })
except Exception as e:
    data = [{"error": str(e) or type(e).__name__}]

print(json.dumps(data))
"#;
